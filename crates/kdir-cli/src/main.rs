use std::path::PathBuf;

use atty::Stream;
use clap::{value_parser, ArgAction, Args, Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use kdir_core::{
    CommandContext, CommandGroup, CommandInfo, CommandStatus, Config, DumpRequest,
    ExecutionOutcome, GlobalOptions, KubeOptions, KubectlClient, LoadRequest, ObjectKind,
    UnknownKind,
};
use serde_json::Value;

mod style;

use style::Style;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = DirectoryCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let global = GlobalOptions {
        quiet: cli.quiet,
        json: cli.json,
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
    };
    let config = Config::load(&global).map_err(|err| eyre!("{err:#}"))?;
    if let Some(path) = config.source() {
        tracing::info!(path = %path.display(), "using config file");
    }

    let (info, outcome) = dispatch(&global, config, &cli.command)?;
    let code = emit_output(&cli, info, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = format!("kdir_core={level},kdir_cli={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn dispatch(
    global: &GlobalOptions,
    config: Config,
    command: &CommandGroupCli,
) -> Result<(CommandInfo, ExecutionOutcome)> {
    match command {
        CommandGroupCli::Dump(args) => {
            let info = CommandInfo::new(CommandGroup::Dump, args.target.kind.resource());
            let client = KubectlClient::new(config.kubectl(), args.target.kube_options());
            let ctx = CommandContext::new(global, config, &client);
            let request = DumpRequest {
                kind: args.target.kind,
                name: args.target.name.clone(),
                namespace: args.target.namespace.clone(),
                basedir: args.target.basedir.clone(),
                outputdir: args.outputdir.clone(),
            };
            let outcome = kdir_core::dump(&ctx, &request).map_err(|err| eyre!("{err:?}"))?;
            Ok((info, outcome))
        }
        CommandGroupCli::Load(args) => {
            let info = CommandInfo::new(CommandGroup::Load, args.target.kind.resource());
            let client = KubectlClient::new(config.kubectl(), args.target.kube_options());
            let ctx = CommandContext::new(global, config, &client);
            let request = LoadRequest {
                kind: args.target.kind,
                name: args.target.name.clone(),
                namespace: args.target.namespace.clone(),
                basedir: args.target.basedir.clone(),
                inputdir: args.inputdir.clone(),
                dry_run: args.dry_run,
            };
            let outcome = kdir_core::load(&ctx, &request).map_err(|err| eyre!("{err:?}"))?;
            Ok((info, outcome))
        }
    }
}

fn emit_output(cli: &DirectoryCli, info: CommandInfo, outcome: &ExecutionOutcome) -> Result<i32> {
    let code = outcome.exit_code();
    let style = Style::new(cli.no_color, atty::is(Stream::Stdout));

    if cli.json {
        let payload = kdir_core::to_json_response(info, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if !cli.quiet {
        let message = kdir_core::format_status_message(info, &outcome.message);
        println!("{}", style.status(outcome.status, &message));
        if let Some(hint) = hint_from_details(&outcome.details) {
            let hint_line = format!("Hint: {hint}");
            println!("{}", style.info(&hint_line));
        }
    } else if outcome.status != CommandStatus::Ok {
        eprintln!("{}", kdir_core::format_status_message(info, &outcome.message));
    }

    Ok(code)
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}

fn parse_kind(value: &str) -> std::result::Result<ObjectKind, UnknownKind> {
    value.parse()
}

const LONG_ABOUT: &str = "\
Dump the contents of a ConfigMap or Secret to a directory as separate files,
and load such a directory back into the cluster.

Each key becomes one file holding the raw value bytes. Labels and annotations
are kept in a .metadata.yaml file in the same directory.

The directory is <basedir>/<configmaps|secrets>/<namespace>/<name> unless
--outputdir (dump) or --inputdir (load) names one explicitly.";

#[derive(Parser, Debug)]
#[command(
    name = "kubectl-directory",
    author,
    version,
    about = "Mirror ConfigMaps and Secrets to and from directories",
    long_about = LONG_ABOUT,
    after_help = "Examples:\n  kubectl directory dump configmap test\n  kubectl directory dump secret test -n test --outputdir testsecret\n  kubectl directory load secret test --dry-run --json\n"
)]
struct DirectoryCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)",
        global = true
    )]
    quiet: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging (-vv reaches debug)",
        global = true
    )]
    verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    no_color: bool,
    #[arg(
        long,
        value_parser = value_parser!(PathBuf),
        help = "Config file (defaults to $KDIR_CONFIG, then ~/.directory.yaml)",
        global = true
    )]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: CommandGroupCli,
}

#[derive(Subcommand, Debug)]
enum CommandGroupCli {
    #[command(
        about = "Dump the contents of an object to a directory as separate files.",
        override_usage = "kubectl-directory dump <configmap|secret> <NAME> [-n NAMESPACE] [--basedir DIR] [--outputdir DIR]",
        after_help = "Examples:\n  # Export the test configmap from the current namespace to ./configmaps/<namespace>/test\n  kubectl directory dump configmap test\n\n  # Export the test secret from the test namespace\n  kubectl directory dump secret test -n test\n\n  # Export the test secret to ./testsecret\n  kubectl directory dump secret test --outputdir testsecret\n"
    )]
    Dump(DumpArgs),
    #[command(
        about = "Load a directory of files into a ConfigMap or Secret.",
        override_usage = "kubectl-directory load <configmap|secret> <NAME> [-n NAMESPACE] [--basedir DIR] [--inputdir DIR] [--dry-run]",
        after_help = "Examples:\n  # Apply ./configmaps/<namespace>/test as the test configmap\n  kubectl directory load configmap test\n\n  # Preview the manifest built from ./testsecret\n  kubectl directory load secret test --inputdir testsecret --dry-run --json\n"
    )]
    Load(LoadArgs),
}

#[derive(Args, Debug)]
struct TargetArgs {
    #[arg(
        value_name = "KIND",
        value_parser = parse_kind,
        help = "Object kind: configmap (cm) or secret"
    )]
    kind: ObjectKind,
    #[arg(value_name = "NAME", help = "Name of the object")]
    name: String,
    #[arg(
        short = 'n',
        long,
        help = "Namespace (defaults to the kubeconfig context's namespace)"
    )]
    namespace: Option<String>,
    #[arg(long, help = "Name of the kubeconfig context to use")]
    context: Option<String>,
    #[arg(
        long,
        value_parser = value_parser!(PathBuf),
        help = "Path to the kubeconfig file to use"
    )]
    kubeconfig: Option<PathBuf>,
    #[arg(
        long,
        value_name = "DIR",
        value_parser = value_parser!(PathBuf),
        help = "Base directory of the <kind>/<namespace>/<name> layout [default: .]"
    )]
    basedir: Option<PathBuf>,
}

impl TargetArgs {
    fn kube_options(&self) -> KubeOptions {
        KubeOptions {
            context: self.context.clone(),
            kubeconfig: self.kubeconfig.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct DumpArgs {
    #[command(flatten)]
    target: TargetArgs,
    #[arg(
        long,
        value_name = "DIR",
        value_parser = value_parser!(PathBuf),
        help = "Write all files into DIR instead of the default layout"
    )]
    outputdir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LoadArgs {
    #[command(flatten)]
    target: TargetArgs,
    #[arg(
        long,
        alias = "outputdir",
        value_name = "DIR",
        value_parser = value_parser!(PathBuf),
        help = "Read files from DIR instead of the default layout"
    )]
    inputdir: Option<PathBuf>,
    #[arg(long, help = "Build the manifest but do not apply it")]
    dry_run: bool,
}
