use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Create or upgrade the safety_voice database", long_about = None)]
pub struct Args {
    /// Database path
    #[arg(short, long, env = "DATABASE_PATH", default_value = "safety_voice.db")]
    pub db_path: String,

    /// Log filter, e.g. `info` or `safety_voice=debug`
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["safety-voice-server"]).unwrap();
        assert_eq!(args.db_path, "safety_voice.db");
    }

    #[test]
    fn test_db_path_flag() {
        let args = Args::try_parse_from(["safety-voice-server", "--db-path", "/tmp/sv.db"]).unwrap();
        assert_eq!(args.db_path, "/tmp/sv.db");
    }
}
