//! Runs a single llm-text operation from the command line.
//!
//! ```text
//! text-cli --provider ollama --model llama3.2 classify "I love it" -c positive -c negative
//! echo "Bonjour" | text-cli detect-language - --confidence
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use llm_text::adapters::ModelAdapter;
use llm_text::adapters::ollama::{OllamaAdapter, OllamaConfig};
use llm_text::adapters::openai::{OpenAiAdapter, OpenAiConfig};
use llm_text::telemetry::{TelemetryConfig, init_tracing};
use llm_text::{
    AnonymizeOptions, AnswerOptions, ClassifyOptions, CompareOptions, ComparisonType,
    DetectLanguageOptions, ExtractOptions, GenerateTagsOptions, GrammarOptions, KeyPointsOptions,
    ParsedResult, PiiType, PointFormat, ReplacementStyle, RewriteOptions, SchemaInput,
    SentimentOptions, Style, SummarizeOptions, SummaryLength, TagStyle, TextClient, TextConfig,
    Tone, TranslateOptions,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "text-cli", version, about = "LLM-backed text operations")]
struct Cli {
    /// Chat provider to call.
    #[arg(long, value_enum, default_value_t = Provider::Ollama)]
    provider: Provider,

    /// Adapter default model.
    #[arg(long, default_value = "llama3.2")]
    model: String,

    /// Provider base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// JSON configuration file; `LLM_TEXT_*` variables are used otherwise.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Provider {
    Ollama,
    Openai,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize text.
    Summarize {
        text: String,
        #[arg(long, value_enum, default_value_t = LengthArg::Medium)]
        length: LengthArg,
        #[arg(long)]
        max_words: Option<u32>,
    },
    /// Translate text.
    Translate {
        text: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        from: Option<String>,
    },
    /// Extract fields described by a JSON schema.
    Extract {
        text: String,
        /// JSON-Schema object or flat `{"field": "type"}` map.
        #[arg(long)]
        schema: String,
    },
    /// Classify text into one of the categories.
    Classify {
        text: String,
        #[arg(short, long = "category", required = true)]
        categories: Vec<String>,
    },
    /// Fix grammar and spelling.
    Grammar {
        text: String,
        #[arg(long)]
        explain: bool,
        #[arg(long)]
        preserve_style: bool,
    },
    /// Analyze sentiment.
    Sentiment {
        text: String,
        #[arg(short, long = "category")]
        categories: Vec<String>,
        #[arg(long)]
        simple: bool,
    },
    /// List key points.
    KeyPoints {
        text: String,
        #[arg(long)]
        max_points: Option<u32>,
        #[arg(long, value_enum, default_value_t = FormatArg::Sentences)]
        format: FormatArg,
    },
    /// Rewrite text.
    Rewrite {
        text: String,
        #[arg(long, value_enum)]
        tone: Option<ToneArg>,
        #[arg(long, value_enum)]
        style: Option<StyleArg>,
        #[arg(long)]
        instruction: Option<String>,
    },
    /// Answer a question about text.
    Answer {
        text: String,
        #[arg(long)]
        question: String,
        #[arg(long)]
        confidence: bool,
    },
    /// Detect the language of text.
    DetectLanguage {
        text: String,
        #[arg(long)]
        confidence: bool,
    },
    /// Generate tags.
    Tags {
        text: String,
        #[arg(long)]
        max_tags: Option<u32>,
        #[arg(long, value_enum, default_value_t = TagArg::Keywords)]
        style: TagArg,
    },
    /// Replace personal data with tokens.
    Anonymize {
        text: String,
        #[arg(long)]
        mapping: bool,
        #[arg(long, value_enum, default_value_t = ReplacementArg::Generic)]
        style: ReplacementArg,
        /// Repeatable; defaults to names, emails, phones and addresses.
        #[arg(long = "pii-type", value_enum)]
        pii_types: Vec<PiiArg>,
    },
    /// Compare two texts.
    Compare {
        text1: String,
        text2: String,
        #[arg(long, value_enum, default_value_t = ComparisonArg::Similarity)]
        kind: ComparisonArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LengthArg {
    Short,
    Medium,
    Detailed,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Sentences,
    Bullets,
    Numbers,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ToneArg {
    Casual,
    Professional,
    Academic,
    Creative,
    Concise,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleArg {
    Concise,
    Detailed,
    Formal,
    Casual,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TagArg {
    Keywords,
    Topics,
    Hashtags,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReplacementArg {
    Generic,
    Numbered,
    Descriptive,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PiiArg {
    Names,
    Emails,
    Phones,
    Addresses,
    Ssn,
    CreditCards,
    All,
}

impl From<PiiArg> for PiiType {
    fn from(value: PiiArg) -> Self {
        match value {
            PiiArg::Names => Self::Names,
            PiiArg::Emails => Self::Emails,
            PiiArg::Phones => Self::Phones,
            PiiArg::Addresses => Self::Addresses,
            PiiArg::Ssn => Self::Ssn,
            PiiArg::CreditCards => Self::CreditCards,
            PiiArg::All => Self::All,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ComparisonArg {
    Similarity,
    Detailed,
    Changes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&TelemetryConfig::default().with_default_filter(cli.log.clone()))?;

    let config = load_config(cli.config.as_deref())?;
    let adapter = build_adapter(&cli)?;
    info!(
        provider = adapter.metadata().provider(),
        model = adapter.metadata().model(),
        "adapter ready"
    );
    let client = TextClient::new(adapter, config);

    let output = run(&client, cli.command).await?;
    println!("{output}");
    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<TextConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(TextConfig::from_json_str(&raw)?)
        }
        None => Ok(TextConfig::from_env()?),
    }
}

fn build_adapter(cli: &Cli) -> Result<Arc<dyn ModelAdapter>> {
    let timeout = Duration::from_secs(cli.timeout);
    let adapter: Arc<dyn ModelAdapter> = match cli.provider {
        Provider::Ollama => {
            let mut config = OllamaConfig::new(&cli.model).with_timeout(timeout);
            if let Some(url) = &cli.base_url {
                config = config.with_base_url(url)?;
            }
            Arc::new(OllamaAdapter::new(config)?)
        }
        Provider::Openai => {
            let mut config = OpenAiConfig::from_env(&cli.model).with_timeout(timeout);
            if let Some(url) = &cli.base_url {
                config = config.with_base_url(url)?;
            }
            Arc::new(OpenAiAdapter::new(config)?)
        }
    };
    Ok(adapter)
}

/// `-` reads the argument from stdin.
fn input(text: String) -> Result<String> {
    if text != "-" {
        return Ok(text);
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("reading stdin")?;
    Ok(buffer)
}

async fn run(client: &TextClient, command: Command) -> Result<String> {
    let output = match command {
        Command::Summarize {
            text,
            length,
            max_words,
        } => {
            let length = match length {
                LengthArg::Short => SummaryLength::Short,
                LengthArg::Medium => SummaryLength::Medium,
                LengthArg::Detailed => SummaryLength::Detailed,
            };
            let mut options = SummarizeOptions::new().with_length(length);
            if let Some(max) = max_words {
                options = options.with_max_words(max);
            }
            client.summarize(&input(text)?, &options).await?
        }
        Command::Translate { text, to, from } => {
            let mut options = TranslateOptions::new(to);
            if let Some(from) = from {
                options = options.with_from(from);
            }
            client.translate(&input(text)?, &options).await?
        }
        Command::Extract { text, schema } => {
            let schema: serde_json::Value =
                serde_json::from_str(&schema).context("--schema must be JSON")?;
            let options = ExtractOptions::new(SchemaInput::Json(schema));
            render(client.extract(&input(text)?, &options).await?)?
        }
        Command::Classify { text, categories } => {
            client
                .classify(&input(text)?, &ClassifyOptions::new(categories))
                .await?
        }
        Command::Grammar {
            text,
            explain,
            preserve_style,
        } => {
            let options = GrammarOptions::new()
                .with_explain(explain)
                .with_preserve_style(preserve_style);
            render(client.fix_grammar(&input(text)?, &options).await?)?
        }
        Command::Sentiment {
            text,
            categories,
            simple,
        } => {
            let mut options = SentimentOptions::new().with_simple(simple);
            if !categories.is_empty() {
                options = options.with_categories(categories);
            }
            render(client.sentiment(&input(text)?, &options).await?)?
        }
        Command::KeyPoints {
            text,
            max_points,
            format,
        } => {
            let format = match format {
                FormatArg::Sentences => PointFormat::Sentences,
                FormatArg::Bullets => PointFormat::Bullets,
                FormatArg::Numbers => PointFormat::Numbers,
            };
            let mut options = KeyPointsOptions::new().with_format(format);
            if let Some(max) = max_points {
                options = options.with_max_points(max);
            }
            client.key_points(&input(text)?, &options).await?.join("\n")
        }
        Command::Rewrite {
            text,
            tone,
            style,
            instruction,
        } => {
            let mut options = RewriteOptions::new();
            if let Some(tone) = tone {
                options = options.with_tone(match tone {
                    ToneArg::Casual => Tone::Casual,
                    ToneArg::Professional => Tone::Professional,
                    ToneArg::Academic => Tone::Academic,
                    ToneArg::Creative => Tone::Creative,
                    ToneArg::Concise => Tone::Concise,
                });
            }
            if let Some(style) = style {
                options = options.with_style(match style {
                    StyleArg::Concise => Style::Concise,
                    StyleArg::Detailed => Style::Detailed,
                    StyleArg::Formal => Style::Formal,
                    StyleArg::Casual => Style::Casual,
                });
            }
            if let Some(instruction) = instruction {
                options = options.with_instruction(instruction);
            }
            client.rewrite(&input(text)?, &options).await?
        }
        Command::Answer {
            text,
            question,
            confidence,
        } => {
            let options = AnswerOptions::new(question).with_confidence(confidence);
            render(client.answer(&input(text)?, &options).await?)?
        }
        Command::DetectLanguage { text, confidence } => {
            let options = DetectLanguageOptions::new().with_confidence(confidence);
            render(client.detect_language(&input(text)?, &options).await?)?
        }
        Command::Tags {
            text,
            max_tags,
            style,
        } => {
            let style = match style {
                TagArg::Keywords => TagStyle::Keywords,
                TagArg::Topics => TagStyle::Topics,
                TagArg::Hashtags => TagStyle::Hashtags,
            };
            let mut options = GenerateTagsOptions::new().with_style(style);
            if let Some(max) = max_tags {
                options = options.with_max_tags(max);
            }
            client.generate_tags(&input(text)?, &options).await?.join("\n")
        }
        Command::Anonymize {
            text,
            mapping,
            style,
            pii_types,
        } => {
            let style = match style {
                ReplacementArg::Generic => ReplacementStyle::Generic,
                ReplacementArg::Numbered => ReplacementStyle::Numbered,
                ReplacementArg::Descriptive => ReplacementStyle::Descriptive,
            };
            let options = AnonymizeOptions::new()
                .with_pii_types(pii_types.into_iter().map(PiiType::from))
                .with_mapping(mapping)
                .with_replacement_style(style);
            render(client.anonymize(&input(text)?, &options).await?)?
        }
        Command::Compare { text1, text2, kind } => {
            if text1 == "-" && text2 == "-" {
                bail!("only one of text1/text2 can be read from stdin");
            }
            let kind = match kind {
                ComparisonArg::Similarity => ComparisonType::Similarity,
                ComparisonArg::Detailed => ComparisonType::Detailed,
                ComparisonArg::Changes => ComparisonType::Changes,
            };
            let options = CompareOptions::new().with_comparison_type(kind);
            render(
                client
                    .compare(&input(text1)?, &input(text2)?, &options)
                    .await?,
            )?
        }
    };
    Ok(output)
}

fn render(result: ParsedResult) -> Result<String> {
    Ok(match result {
        ParsedResult::Text(text) => text,
        ParsedResult::Boolean(value) => value.to_string(),
        ParsedResult::Mapping(map) => serde_json::to_string_pretty(&map)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymize_accepts_repeated_pii_types() {
        let cli = Cli::try_parse_from([
            "text-cli",
            "anonymize",
            "Jane, 123-45-6789",
            "--pii-type",
            "ssn",
            "--pii-type",
            "credit-cards",
            "--pii-type",
            "all",
        ])
        .unwrap();
        let Command::Anonymize { pii_types, .. } = cli.command else {
            panic!("expected anonymize");
        };
        let kinds: Vec<PiiType> = pii_types.into_iter().map(PiiType::from).collect();
        assert_eq!(kinds, [PiiType::Ssn, PiiType::CreditCards, PiiType::All]);
    }

    #[test]
    fn rewrite_accepts_style() {
        let cli =
            Cli::try_parse_from(["text-cli", "rewrite", "yo", "--style", "formal"]).unwrap();
        let Command::Rewrite { style, tone, .. } = cli.command else {
            panic!("expected rewrite");
        };
        assert!(matches!(style, Some(StyleArg::Formal)));
        assert!(tone.is_none());
    }
}
