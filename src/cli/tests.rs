#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use crate::config::LLMProvider;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_args_default_values() {
        let args = Args::try_parse_from(["autowriter"]).unwrap();

        assert_eq!(args.workspace_path, PathBuf::from("./workspace/project01"));
        assert!(args.name.is_none());
        assert!(!args.strict_generation);
        assert!(!args.llm_refine_outline);
        assert!(!args.verbose);
        assert!(!args.force_regenerate);
    }

    #[test]
    fn test_args_short_options() {
        let args = Args::try_parse_from([
            "autowriter",
            "-w",
            "/test/workspace",
            "-n",
            "测试项目",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.workspace_path, PathBuf::from("/test/workspace"));
        assert_eq!(args.name, Some("测试项目".to_string()));
        assert!(args.verbose);
    }

    #[test]
    fn test_args_long_options() {
        let args = Args::try_parse_from([
            "autowriter",
            "--workspace-path",
            "/test/workspace",
            "--strict-generation",
            "--llm-refine-outline",
            "--force-regenerate",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(args.workspace_path, PathBuf::from("/test/workspace"));
        assert!(args.strict_generation);
        assert!(args.llm_refine_outline);
        assert!(args.force_regenerate);
        assert!(args.verbose);
    }

    #[test]
    fn test_args_llm_options() {
        let args = Args::try_parse_from([
            "autowriter",
            "--llm-provider",
            "deepseek",
            "--model-efficient",
            "deepseek-chat",
            "--max-tokens",
            "8192",
            "--temperature",
            "0.1",
            "--max-parallels",
            "4",
        ])
        .unwrap();

        assert_eq!(args.llm_provider, Some("deepseek".to_string()));
        assert_eq!(args.model_efficient, Some("deepseek-chat".to_string()));
        assert_eq!(args.max_tokens, Some(8192));
        assert_eq!(args.temperature, Some(0.1));
        assert_eq!(args.max_parallels, Some(4));
    }

    #[test]
    fn test_into_config_overrides() {
        let args = Args::try_parse_from([
            "autowriter",
            "-w",
            "/ws/demo",
            "-n",
            "示范项目",
            "--llm-provider",
            "deepseek",
            "--max-parallels",
            "3",
            "--strict-generation",
        ])
        .unwrap();

        let config = args.into_config();
        assert_eq!(config.workspace_path, PathBuf::from("/ws/demo"));
        assert_eq!(config.internal_path, PathBuf::from("/ws/demo/.autowriter"));
        assert_eq!(config.project_name, Some("示范项目".to_string()));
        assert_eq!(config.llm.provider, LLMProvider::DeepSeek);
        assert_eq!(config.llm.max_parallels, 3);
        assert!(config.strict_generation);
    }

    #[test]
    fn test_into_config_unknown_provider_keeps_default() {
        let args =
            Args::try_parse_from(["autowriter", "--llm-provider", "no-such-provider"]).unwrap();
        let config = args.into_config();
        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
    }
}
