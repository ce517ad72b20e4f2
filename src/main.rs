//! LUKHΛS CLI - Command-line portal for the showcase demonstrations
//!
//! Architecture: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to library operations
//! - Handles external concerns like stdin sessions, process exit codes and terminal output
//! - Interactive loops read from any BufRead so they can be driven from tests

use anyhow::{bail, Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use lukhas_showcase::agents::workforce::standard_goal;
use lukhas_showcase::consciousness::monitor;
use lukhas_showcase::showcase::{self as catalogue, Demo, DemoKind, DEMOS};
use lukhas_showcase::tone::EXAMPLE_PROMPTS;
use lukhas_showcase::{
    AgentGoal, AgentKind, AgentOrchestrator, CollapseMode, OutputFormat,
    ReportFormatter, ReportOptions, Showcase, ShowcaseConfig,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// LUKHΛS Showcase - adaptive tone, consciousness states and autonomous agents
#[derive(Parser)]
#[command(name = "lukhas")]
#[command(version)]
#[command(about = "Interactive showcase of the LUKHΛS demonstrations")]
#[command(long_about = "Runs the LUKHΛS demonstrations: the three-layer tone system, consciousness state transitions, quantum-inspired reasoning and the autonomous agent workforce. Without a command the interactive portal is started.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Seed for reproducible runs (overrides the configuration)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormatArg,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to the three-layer tone system
    Tone {
        /// Messages to answer; interactive session when none are given
        #[arg(short, long, action = clap::ArgAction::Append)]
        message: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Watch consciousness state transitions
    Consciousness {
        /// Number of steps to run; interactive monitor when absent
        #[arg(long)]
        steps: Option<usize>,

        /// Apply a random stimulus every K steps (0 disables)
        #[arg(long, default_value = "0")]
        stimulus_every: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Solve the route-planning example with quantum-inspired reasoning
    Reason {
        /// Interference rounds
        #[arg(long, default_value = "3")]
        rounds: u32,

        /// Interference gain
        #[arg(long, default_value = "1.0")]
        gain: f64,

        /// Sample the collapse instead of taking the most probable candidate
        #[arg(long)]
        sample: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Deploy a fleet of autonomous agents and let it run
    Agents {
        /// Number of agents to deploy
        #[arg(long, default_value = "3")]
        count: usize,

        /// Kind of agent
        #[arg(long, value_enum, default_value = "general")]
        kind: AgentKindArg,

        /// Goal description; the kind's standard goal when absent
        #[arg(long)]
        goal: Option<String>,

        /// How long the fleet runs, in milliseconds
        #[arg(long, default_value = "3000")]
        run_ms: u64,

        /// Tick interval override, in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Do not persist agent state on shutdown
        #[arg(long)]
        no_persist: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Simulate the NIΛS, ΛBAS and DΛST workforce and report ROI
    Workforce {
        /// Number of employees in the company
        #[arg(long, default_value = "1000")]
        company_size: usize,

        /// Simulation ticks
        #[arg(long, default_value = "60")]
        ticks: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// List the available demonstrations
    Demos {
        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Launch a demonstration by number or name
    Demo {
        /// Demo number (1-6) or name
        id: String,
    },

    /// About LUKHΛS
    About,

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },

    /// Manage persisted agent state
    State {
        #[command(subcommand)]
        action: StateCommands,
    },
}

#[derive(Subcommand)]
enum StateCommands {
    /// Show state directory statistics
    Stats,

    /// Remove every persisted snapshot
    Clear,

    /// Remove old or unreadable snapshots
    Cleanup {
        /// Maximum snapshot age in days
        #[arg(long, default_value = "7")]
        max_age_days: i64,
    },
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum LogFormatArg {
    Text,
    Json,
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum AgentKindArg {
    General,
    Nias,
    Abas,
    Dast,
}

impl From<AgentKindArg> for AgentKind {
    fn from(arg: AgentKindArg) -> Self {
        match arg {
            AgentKindArg::General => AgentKind::General,
            AgentKindArg::Nias => AgentKind::EmotionalIntelligence,
            AgentKindArg::Abas => AgentKind::ProductivityOptimizer,
            AgentKindArg::Dast => AgentKind::ContextOrchestrator,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.log_format);

    // Run the command and handle the result
    match run_command(cli).await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run_command(cli: Cli) -> Result<i32> {
    if let Some(Commands::ValidateConfig { config_file }) = &cli.command {
        return run_validate_config(config_file.clone().or(cli.config.clone()));
    }

    let showcase = build_showcase(cli.config.clone(), cli.seed, !cli.no_color)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        None => run_portal(&showcase, stdin.lock(), &mut out).await,
        Some(Commands::Tone { message, format }) => {
            if message.is_empty() {
                run_tone_session(&showcase, stdin.lock(), &mut out)
            } else {
                run_tone(&showcase, &message, format.into(), &mut out)
            }
        }
        Some(Commands::Consciousness {
            steps,
            stimulus_every,
            format,
        }) => match steps {
            Some(steps) => run_consciousness(&showcase, steps, stimulus_every, format.into(), &mut out),
            None => run_consciousness_monitor(&showcase, stdin.lock(), &mut out),
        },
        Some(Commands::Reason {
            rounds,
            gain,
            sample,
            format,
        }) => run_reason(&showcase, rounds, gain, sample, format.into(), &mut out),
        Some(Commands::Agents {
            count,
            kind,
            goal,
            run_ms,
            tick_ms,
            no_persist,
            format,
        }) => {
            let options = FleetRunOptions {
                kind: kind.into(),
                count,
                goal,
                run_for: Duration::from_millis(run_ms),
                tick_ms,
                persist: !no_persist,
            };
            run_agents(&showcase, options, format.into(), &mut out).await
        }
        Some(Commands::Workforce {
            company_size,
            ticks,
            format,
        }) => run_workforce(&showcase, company_size, ticks, format.into(), &mut out),
        Some(Commands::Demos { format }) => run_list_demos(&showcase, format.into(), &mut out),
        Some(Commands::Demo { id }) => run_demo(&showcase, &id, stdin.lock(), &mut out).await,
        Some(Commands::About) => {
            writeln!(out, "{}", catalogue::about())?;
            Ok(0)
        }
        Some(Commands::State { action }) => run_state_command(&showcase, action, &mut out),
        Some(Commands::ValidateConfig { .. }) => Ok(0),
    }
}

fn build_showcase(config_path: Option<PathBuf>, seed: Option<u64>, use_colors: bool) -> Result<Showcase> {
    let mut config = ShowcaseConfig::discover(config_path.as_deref()).context("Failed to load configuration")?;
    if seed.is_some() {
        config.seed = seed;
    }

    let formatter = ReportFormatter::new(ReportOptions {
        use_colors,
        ..Default::default()
    });
    Ok(Showcase::new_with_config(config)?.with_report_formatter(formatter))
}

fn run_tone<W: Write>(showcase: &Showcase, messages: &[String], format: OutputFormat, out: &mut W) -> Result<i32> {
    let mut tone = showcase.tone_system()?;
    let mut rng = showcase.rng();

    for message in messages {
        let exchange = tone.respond(message, &mut rng);
        write!(out, "{}", showcase.formatter().format_exchange(&exchange, format, false)?)?;
        if format == OutputFormat::Json {
            writeln!(out)?;
        }
    }
    Ok(0)
}

fn run_tone_session<R: BufRead, W: Write>(showcase: &Showcase, input: R, out: &mut W) -> Result<i32> {
    let mut tone = showcase.tone_system()?;
    let mut rng = showcase.rng();
    let formatter = showcase.formatter();

    writeln!(out, "🎭 LUKHΛS Three-Layer Tone System")?;
    writeln!(out, "Type a message, or 'help' for commands.\n")?;

    for line in input.lines() {
        let line = line?;
        let input = line.trim();

        match input.to_lowercase().as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                writeln!(out, "Commands:")?;
                writeln!(out, "  help      - show this help")?;
                writeln!(out, "  examples  - show example prompts")?;
                writeln!(out, "  status    - show the current tone layer and emotional state")?;
                writeln!(out, "  quit      - leave the session")?;
                writeln!(out, "Add --debug to a message to see its context analysis.")?;
            }
            "examples" => {
                writeln!(out, "💡 Example prompts:")?;
                for (i, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
                    writeln!(out, "  {}. {}", i + 1, prompt)?;
                }
            }
            "status" => {
                write!(out, "{}", formatter.format_tone_status(&tone.status(), OutputFormat::Human)?)?;
            }
            _ => {
                let debug = input.contains("--debug");
                let message = input.replace("--debug", "");
                let exchange = tone.respond(message.trim(), &mut rng);
                write!(out, "{}", formatter.format_exchange(&exchange, OutputFormat::Human, debug)?)?;
            }
        }
        writeln!(out)?;
    }

    writeln!(out, "👋 {} exchanges this session.", tone.history().len())?;
    Ok(0)
}

fn run_consciousness<W: Write>(
    showcase: &Showcase,
    steps: usize,
    stimulus_every: usize,
    format: OutputFormat,
    out: &mut W,
) -> Result<i32> {
    let mut consciousness = showcase.consciousness();
    let mut rng = showcase.rng();

    for step in 1..=steps {
        let stimulus = (stimulus_every > 0 && step % stimulus_every == 0)
            .then(|| consciousness.random_stimulus(&mut rng));
        consciousness.step(stimulus, &mut rng);
        write!(
            out,
            "{}",
            showcase
                .formatter()
                .format_consciousness(step, &consciousness.snapshot(), format)?
        )?;
    }

    if format == OutputFormat::Human {
        writeln!(out)?;
        write!(out, "{}", monitor::render(&consciousness))?;
    }
    Ok(0)
}

fn run_consciousness_monitor<R: BufRead, W: Write>(showcase: &Showcase, input: R, out: &mut W) -> Result<i32> {
    let mut consciousness = showcase.consciousness();
    let mut rng = showcase.rng();
    let mut lines = input.lines();

    loop {
        monitor::clear_screen(out)?;
        write!(out, "{}", monitor::render(&consciousness))?;
        writeln!(out, "\n[Enter] advance  [s] stimulus  [q] quit")?;
        out.flush()?;

        let Some(line) = lines.next() else { break };
        let stimulus = match line?.trim().to_lowercase().as_str() {
            "q" | "quit" => break,
            "s" => {
                let stimulus = consciousness.random_stimulus(&mut rng);
                writeln!(out, "⚡ Stimulus applied: {:.2}", stimulus)?;
                Some(stimulus)
            }
            _ => None,
        };
        consciousness.step(stimulus, &mut rng);
    }

    writeln!(out, "✨ Final state: {}", consciousness.current_state())?;
    Ok(0)
}

fn run_reason<W: Write>(
    showcase: &Showcase,
    rounds: u32,
    gain: f64,
    sample: bool,
    format: OutputFormat,
    out: &mut W,
) -> Result<i32> {
    let mode = if sample {
        CollapseMode::Sampled
    } else {
        CollapseMode::MostProbable
    };
    let run = showcase.reason_route(rounds, gain, mode)?;
    write!(out, "{}", showcase.formatter().format_reasoning(&run, format)?)?;
    if format == OutputFormat::Json {
        writeln!(out)?;
    }
    Ok(0)
}

struct FleetRunOptions {
    kind: AgentKind,
    count: usize,
    goal: Option<String>,
    run_for: Duration,
    tick_ms: Option<u64>,
    persist: bool,
}

async fn run_agents<W: Write>(
    showcase: &Showcase,
    options: FleetRunOptions,
    format: OutputFormat,
    out: &mut W,
) -> Result<i32> {
    if options.count == 0 {
        bail!("--count must be at least 1");
    }

    let config = showcase.config();
    let mut settings = config.agents.clone();
    if let Some(tick_ms) = options.tick_ms.filter(|ms| *ms > 0) {
        settings.tick_interval_ms = tick_ms;
    }

    let mut orchestrator = AgentOrchestrator::new()
        .with_seed(config.seed)
        .with_workforce(config.workforce.clone());
    let ids = orchestrator.deploy_fleet(options.kind, options.count, &settings)?;

    let employees = orchestrator.employees_for(options.kind);
    for id in &ids {
        let goal = match &options.goal {
            Some(description) => AgentGoal::new(description.clone()),
            None => standard_goal(options.kind, employees),
        };
        orchestrator.assign_goal(id, goal).await?;
    }
    for (i, first) in ids.iter().enumerate() {
        for second in &ids[i + 1..] {
            orchestrator.connect(first, second).await?;
        }
    }

    tokio::time::sleep(options.run_for).await;
    finish_fleet_run(showcase, orchestrator, options.persist, format, out).await
}

/// Report on a running fleet, stop it and pick the exit code
async fn finish_fleet_run<W: Write>(
    showcase: &Showcase,
    mut orchestrator: AgentOrchestrator,
    persist: bool,
    format: OutputFormat,
    out: &mut W,
) -> Result<i32> {
    let status = orchestrator.fleet_status().await;
    write!(out, "{}", showcase.formatter().format_fleet_status(&status, format)?)?;
    if format == OutputFormat::Json {
        writeln!(out)?;
    }

    let store = showcase.state_store();
    orchestrator
        .shutdown_all(persist.then_some(&store))
        .await
        .context("Failed to persist agent state")?;

    if persist && format == OutputFormat::Human {
        writeln!(out, "💾 State saved to {}", store.dir().display())?;
    }

    let failed = status.agents.iter().any(|a| a.has_failures());
    Ok(if failed { 2 } else { 0 })
}

fn run_workforce<W: Write>(
    showcase: &Showcase,
    company_size: usize,
    ticks: u64,
    format: OutputFormat,
    out: &mut W,
) -> Result<i32> {
    let workforce = showcase.simulate_workforce(company_size, ticks)?;
    let report = workforce.executive_report(&mut showcase.rng(), Utc::now());

    if format == OutputFormat::Human {
        writeln!(out, "🤖 Deployed {} agents for {} employees\n", workforce.agents().len(), company_size)?;
    }
    write!(out, "{}", showcase.formatter().format_executive_report(&report, format)?)?;
    if format == OutputFormat::Json {
        writeln!(out)?;
    }

    Ok(if workforce.has_errors() { 2 } else { 0 })
}

fn run_list_demos<W: Write>(showcase: &Showcase, format: OutputFormat, out: &mut W) -> Result<i32> {
    write!(out, "{}", showcase.formatter().format_demos(&DEMOS, format)?)?;
    if format == OutputFormat::Json {
        writeln!(out)?;
    }
    Ok(0)
}

async fn run_demo<R: BufRead, W: Write>(showcase: &Showcase, id: &str, input: R, out: &mut W) -> Result<i32> {
    let Some(demo) = catalogue::find(id) else {
        eprintln!("❌ Unknown demo '{}'", id);
        run_list_demos(showcase, OutputFormat::Human, out)?;
        return Ok(1);
    };
    launch(showcase, demo, input, out).await
}

async fn launch<R: BufRead, W: Write>(showcase: &Showcase, demo: &Demo, input: R, out: &mut W) -> Result<i32> {
    writeln!(out, "\n🚀 Launching: {}", demo.name)?;
    writeln!(out, "   {}", demo.description)?;
    writeln!(out, "\n{}\n", "─".repeat(70))?;

    if let Some(overview) = catalogue::overview(demo.kind) {
        writeln!(out, "{}\n", overview)?;
    }

    match demo.kind {
        DemoKind::Tone => run_tone_session(showcase, input, out),
        DemoKind::Consciousness => run_consciousness_monitor(showcase, input, out),
        DemoKind::QuantumReasoning => run_reason(showcase, 3, 1.0, false, OutputFormat::Human, out),
        DemoKind::AbstractReasoning => Ok(0),
        DemoKind::Workforce => run_workforce(showcase, 1000, 60, OutputFormat::Human, out),
        DemoKind::AutonomousFramework => {
            let options = FleetRunOptions {
                kind: AgentKind::General,
                count: 3,
                goal: Some("Optimize system performance".to_string()),
                run_for: Duration::from_secs(3),
                tick_ms: Some(200),
                persist: true,
            };
            run_agents(showcase, options, OutputFormat::Human, out).await
        }
    }
}

async fn run_portal<R: BufRead, W: Write>(showcase: &Showcase, mut input: R, out: &mut W) -> Result<i32> {
    loop {
        writeln!(out, "{}", catalogue::banner())?;
        write!(out, "{}", showcase.formatter().format_demos(&DEMOS, OutputFormat::Human)?)?;
        writeln!(out, "\n📌 Special Commands:")?;
        writeln!(out, "  [A] About LUKHΛS")?;
        writeln!(out, "  [Q] Quit")?;
        write!(out, "\n🎯 Select an option: ")?;
        out.flush()?;

        let mut choice = String::new();
        if input.read_line(&mut choice)? == 0 {
            break;
        }

        match choice.trim().to_uppercase().as_str() {
            "Q" => break,
            "A" => writeln!(out, "{}", catalogue::about())?,
            other => match catalogue::find(other) {
                Some(demo) => {
                    let code = launch(showcase, demo, &mut input, out).await?;
                    if code != 0 {
                        writeln!(out, "⚠️  Demo finished with exit code {}", code)?;
                    }
                }
                None => writeln!(out, "❌ Invalid selection. Please try again.")?,
            },
        }
    }

    writeln!(out, "\n✨ Thank you for exploring LUKHΛS AI!")?;
    Ok(0)
}

fn run_validate_config(config_path: Option<PathBuf>) -> Result<i32> {
    let config_path = config_path.unwrap_or_else(|| PathBuf::from("lukhas.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match ShowcaseConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");
            println!("📊 Configuration summary:");
            println!("  Version: {}", config.version);
            println!("  Fingerprint: {}", &config.fingerprint()[..16]);
            println!(
                "  Seed: {}",
                config.seed.map_or_else(|| "entropy".to_string(), |s| s.to_string())
            );
            println!(
                "  Staffing: NIΛS 1/{}, ΛBAS 1/{}, DΛST 1/{}",
                config.workforce.nias_employees_per_agent,
                config.workforce.abas_employees_per_agent,
                config.workforce.dast_employees_per_agent
            );
            println!("  State directory: {}", config.agents.state_dir.display());
            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {}", e);
            Ok(1)
        }
    }
}

fn run_state_command<W: Write>(showcase: &Showcase, action: StateCommands, out: &mut W) -> Result<i32> {
    let store = showcase.state_store();

    match action {
        StateCommands::Stats => {
            let stats = store.statistics()?;
            writeln!(out, "📊 Agent State")?;
            writeln!(out, "   Directory: {}", store.dir().display())?;
            write!(out, "   {}", showcase.formatter().format_store_statistics(&stats, OutputFormat::Human)?)?;
            for id in store.list()? {
                writeln!(out, "   • {}", id)?;
            }
            Ok(0)
        }
        StateCommands::Clear => {
            let removed = store.clear()?;
            writeln!(out, "✅ Removed {} snapshots from {}", removed, store.dir().display())?;
            Ok(0)
        }
        StateCommands::Cleanup { max_age_days } => {
            if max_age_days < 0 {
                bail!("--max-age-days must not be negative");
            }
            let max_age = ChronoDuration::try_days(max_age_days)
                .with_context(|| format!("--max-age-days {} is out of range", max_age_days))?;
            let removed = store.cleanup(max_age, Utc::now())?;
            writeln!(out, "✅ Cleaned up {} stale snapshots", removed)?;
            Ok(0)
        }
    }
}

fn init_logging(verbose: bool, format: LogFormatArg) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lukhas_showcase::{
        AgentBehavior, AgentSettings, AgentTask, AutonomousAgent, ConfigBuilder, ShowcaseError,
        ShowcaseResult, StateStore, TaskOutcome,
    };
    use rand::RngCore;
    use rstest::rstest;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn showcase_in(dir: &TempDir) -> Showcase {
        let config = ConfigBuilder::new()
            .seed(17)
            .tick_interval_ms(10)
            .state_dir(dir.path().join("agents"))
            .build()
            .unwrap();
        let formatter = ReportFormatter::new(ReportOptions {
            use_colors: false,
            ..Default::default()
        });
        Showcase::new_with_config(config)
            .unwrap()
            .with_report_formatter(formatter)
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_tone_messages() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let messages = vec!["Hello!".to_string(), "Explain the algorithm architecture".to_string()];

        let code = run_tone(&showcase_in(&dir), &messages, OutputFormat::Human, &mut out).unwrap();
        assert_eq!(code, 0);
        let text = output(out);
        assert!(text.contains("[💬 User Friendly]"));
        assert!(text.contains("Tone shift: 💬 User Friendly → 📚 Academic"));
    }

    #[test]
    fn test_tone_session_commands() {
        let dir = TempDir::new().unwrap();
        let input = Cursor::new("help\nexamples\nI feel stuck --debug\nstatus\nquit\nignored\n");
        let mut out = Vec::new();

        run_tone_session(&showcase_in(&dir), input, &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("Commands:"));
        assert!(text.contains(EXAMPLE_PROMPTS[0]));
        assert!(text.contains("Emotion: seeking_help"));
        assert!(text.contains("Interactions: 1"));
        assert!(text.contains("1 exchanges this session"));
    }

    #[test]
    fn test_consciousness_steps() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        run_consciousness(&showcase_in(&dir), 12, 3, OutputFormat::Human, &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("Step  12:"));
        assert!(text.contains("CONSCIOUSNESS STATE MONITOR"));
    }

    #[test]
    fn test_consciousness_json_lines() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        run_consciousness(&showcase_in(&dir), 5, 0, OutputFormat::Json, &mut out).unwrap();
        let text = output(out);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        let last: serde_json::Value = serde_json::from_str(lines[4]).unwrap();
        assert_eq!(last["time"], 5);
    }

    #[test]
    fn test_consciousness_monitor_quits() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        run_consciousness_monitor(&showcase_in(&dir), Cursor::new("\ns\nq\n"), &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("Stimulus applied"));
        assert!(text.contains("Final state:"));
    }

    #[test]
    fn test_reason_json() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        run_reason(&showcase_in(&dir), 4, 2.0, false, OutputFormat::Json, &mut out).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output(out)).unwrap();
        assert_eq!(parsed["collapse"]["chosen"], "Coastal Highway");
    }

    #[test]
    fn test_workforce_report() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();

        let code = run_workforce(&showcase_in(&dir), 200, 20, OutputFormat::Human, &mut out).unwrap();
        assert_eq!(code, 0);
        let text = output(out);
        assert!(text.contains("Deployed 4 agents for 200 employees"));
        assert!(text.contains("ROI Analysis"));
    }

    #[tokio::test]
    async fn test_agents_run_and_persist() {
        let dir = TempDir::new().unwrap();
        let showcase = showcase_in(&dir);
        let options = FleetRunOptions {
            kind: AgentKind::EmotionalIntelligence,
            count: 2,
            goal: None,
            run_for: Duration::from_millis(150),
            tick_ms: None,
            persist: true,
        };
        let mut out = Vec::new();

        let code = run_agents(&showcase, options, OutputFormat::Human, &mut out).await.unwrap();
        assert_eq!(code, 0);
        assert!(output(out).contains("Fleet Status"));

        let store = StateStore::new(dir.path().join("agents"));
        assert_eq!(store.list().unwrap(), vec!["nias_000", "nias_001"]);
    }

    /// Every task it runs times out
    struct Offline;

    impl AgentBehavior for Offline {
        fn kind(&self) -> AgentKind {
            AgentKind::General
        }

        fn decompose(&self, goal: &AgentGoal) -> ShowcaseResult<Vec<AgentTask>> {
            Ok(vec![AgentTask::new("sync_calendar").for_goal(goal)])
        }

        fn execute(&self, task: &AgentTask, _rng: &mut dyn RngCore) -> ShowcaseResult<TaskOutcome> {
            Err(ShowcaseError::task(&task.action, "timeout"))
        }
    }

    #[tokio::test]
    async fn test_failing_fleet_exits_with_two() {
        let dir = TempDir::new().unwrap();
        let showcase = showcase_in(&dir);
        let settings = AgentSettings {
            max_retries: 0,
            ..showcase.config().agents.clone()
        };

        let mut orchestrator = AgentOrchestrator::new();
        orchestrator
            .deploy_agent(AutonomousAgent::new("general_000", Box::new(Offline)), &settings)
            .unwrap();
        orchestrator
            .assign_goal("general_000", AgentGoal::new("keep calendars in sync"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        let mut out = Vec::new();
        let code = finish_fleet_run(&showcase, orchestrator, false, OutputFormat::Human, &mut out)
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_agents_rejects_empty_fleet() {
        let dir = TempDir::new().unwrap();
        let options = FleetRunOptions {
            kind: AgentKind::General,
            count: 0,
            goal: None,
            run_for: Duration::from_millis(10),
            tick_ms: None,
            persist: false,
        };
        let mut out = Vec::new();
        assert!(run_agents(&showcase_in(&dir), options, OutputFormat::Human, &mut out).await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_demo() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let code = run_demo(&showcase_in(&dir), "42", Cursor::new(""), &mut out).await.unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_abstract_reasoning_demo_shows_overview() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let code = run_demo(&showcase_in(&dir), "4", Cursor::new(""), &mut out).await.unwrap();
        assert_eq!(code, 0);
        assert!(output(out).contains("Concept Folding"));
    }

    #[tokio::test]
    async fn test_portal_about_and_quit() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        run_portal(&showcase_in(&dir), Cursor::new("a\nx\nq\n"), &mut out).await.unwrap();
        let text = output(out);
        assert!(text.contains("ABOUT LUKHΛS AI"));
        assert!(text.contains("Invalid selection"));
        assert!(text.contains("Thank you for exploring"));
    }

    #[test]
    fn test_validate_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("lukhas.yaml");

        let yaml = ShowcaseConfig::default().to_yaml().unwrap();
        fs::write(&config_file, yaml).unwrap();
        assert_eq!(run_validate_config(Some(config_file)).unwrap(), 0);

        let broken = temp_dir.path().join("broken.yaml");
        fs::write(&broken, "agents:\n  tick_interval_ms: 0\n").unwrap();
        assert_eq!(run_validate_config(Some(broken)).unwrap(), 1);
    }

    #[test]
    fn test_state_commands() {
        let dir = TempDir::new().unwrap();
        let showcase = showcase_in(&dir);
        let mut out = Vec::new();

        assert_eq!(run_state_command(&showcase, StateCommands::Stats, &mut out).unwrap(), 0);
        assert_eq!(run_state_command(&showcase, StateCommands::Clear, &mut out).unwrap(), 0);
        assert_eq!(
            run_state_command(&showcase, StateCommands::Cleanup { max_age_days: 7 }, &mut out).unwrap(),
            0
        );
        let text = output(out.clone());
        assert!(text.contains("State: 0 snapshots"));
        assert!(text.contains("Removed 0 snapshots"));
        assert!(run_state_command(&showcase, StateCommands::Cleanup { max_age_days: -1 }, &mut out).is_err());
    }

    #[rstest]
    #[case(100_000_000)]
    #[case(i64::MAX)]
    fn test_cleanup_with_huge_age_fails_cleanly(#[case] max_age_days: i64) {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let result = run_state_command(&showcase_in(&dir), StateCommands::Cleanup { max_age_days }, &mut out);
        assert!(result.is_err());
    }
}
