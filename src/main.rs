use anyhow::Context;
use clap::Parser;
use cv_bldr::utils::error::{CvError, ErrorSeverity};
use cv_bldr::utils::{logger, validation::Validate};
use cv_bldr::{
    Clock, CliConfig, FixedClock, LocalStorage, Pipeline, ResumeEngine, ResumePipeline,
    SystemClock, TomlConfig,
};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 先解析配置，日誌等級可能來自 TOML
    let resolved = cli.resolve();
    let level = resolved.as_ref().ok().and_then(|c| c.log_level().map(str::to_string));
    logger::init_cli_logger(cli.verbose, level.as_deref(), cli.log_format);

    tracing::info!("Starting cv-bldr");
    if let Some(path) = cli.config_path() {
        tracing::info!("📁 Loading configuration from: {}", path);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match resolved.and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let today = match cli.today() {
        Ok(Some(date)) => date,
        Ok(None) => SystemClock.today(),
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Using {} as today", today);

    let dry_run = cli.dry_run;
    let storage = LocalStorage::new(".");
    let pipeline = ResumePipeline::new(storage, config, FixedClock(today));
    let engine = ResumeEngine::new(pipeline);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No document will be written");
        return perform_dry_run(&engine).context("dry run failed");
    }

    match engine.run() {
        Ok(output_path) => {
            tracing::info!("✅ Resume built successfully!");
            println!("✅ Resume built successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}

fn perform_dry_run(engine: &ResumeEngine<ResumePipeline<LocalStorage, TomlConfig, FixedClock>>) -> anyhow::Result<()> {
    let pipeline = engine.pipeline();
    let raw_text = pipeline.extract().context("reading experience log")?;
    let result = pipeline.transform(raw_text).context("parsing experience log")?;

    println!("Skills ({}):", result.skills.len());
    for skill in &result.skills {
        println!("  - {}", skill);
    }

    println!("Experience ({}):", result.entries.len());
    for entry in &result.entries {
        println!("  {} | {}", entry.record.company, entry.record.title);
        println!("    {}", entry.tenure);
        for accolade in &entry.record.accolades {
            println!("    - {}", accolade);
        }
    }

    Ok(())
}

fn exit_with(e: &CvError) -> ! {
    tracing::error!(
        "❌ Resume build failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
