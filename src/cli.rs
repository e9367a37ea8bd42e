use std::path::PathBuf;

use clap::{Args, Parser};

use crate::semantic::MAX_EMBED_CHARS;

#[derive(Parser, Debug)]
#[command(
    name = "docembed",
    version,
    about = "Generate vector embeddings for stored documents"
)]
pub struct Cli {
    #[command(flatten)]
    pub embed: EmbedArgs,
}

#[derive(Args, Debug, Clone)]
pub struct EmbedArgs {
    /// Regenerate embeddings for every document, not only the missing ones
    #[arg(short = 'f', long, default_value_t = false)]
    pub force: bool,

    #[arg(long, env = "DOCEMBED_DB_PATH", default_value = "documents.sqlite")]
    pub db_path: PathBuf,

    /// Ollama-compatible embeddings endpoint
    #[arg(
        long,
        env = "DOCEMBED_ENDPOINT",
        default_value = "http://localhost:11434/api/embeddings"
    )]
    pub endpoint: String,

    #[arg(long, env = "DOCEMBED_MODEL", default_value = "all-minilm")]
    pub model: String,

    /// Max seconds to wait for each embedding request
    #[arg(
        long,
        env = "DOCEMBED_TIMEOUT_SECS",
        default_value_t = 120,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Prepared text is cut to this many characters before embedding
    #[arg(long, env = "DOCEMBED_MAX_CHARS", default_value_t = MAX_EMBED_CHARS)]
    pub max_chars: usize,
}
