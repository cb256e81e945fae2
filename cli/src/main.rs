//! Keyfit CLI - binary entry point.
//!
//! Loads a compatibility dataset, replays a click sequence through the
//! engine, and prints the resulting board: one line per candidate item with
//! its display state, the compatible-candidate sets, and the completion
//! score. The engine itself never touches the filesystem; this binary owns
//! the dataset, policy and preference boundaries.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use keyfit_config::EnginePolicy;
use keyfit_core::{DEFAULT_THRESHOLD, Engine};
use keyfit_data::{PreferenceStore, bundled_dataset, load_dataset};
use keyfit_types::{
    ComponentState, Dataset, ItemRef, NodeId, Platform, Selection, SignerId, SignerWillingness,
    Threshold, UserPreference, WalletId,
};

const USAGE: &str = "\
Usage: keyfit [OPTIONS] [COMMAND] [CLICK...]

Commands:
  state       Print every item's display state and the completion score (default)
  score       Print only the completion score
  wallets     Print the compatible wallet ids for the current selection
  signers     Print the compatible signer ids for the current selection
  nodes       Print the compatible node ids for the current selection

Clicks (applied in order before the command output):
  signer:<id>   wallet:<id>   node:<id>
  slot<N>:<id>  fill multi-sig slot N        slot<N>:-  clear it

Options:
  --data <path>        Dataset JSON file (default: the bundled dataset)
  --policy <path>      Engine policy TOML file (default: built-in policy)
  --prefs <path>       Preference file, read at start and saved when a click
                       implies a preference change
  --device <mobile|desktop>
  --willingness <with-signer|no-signer>
  --multi              Start in multi-sig mode
  --threshold <2-of-3|3-of-5>
  -h, --help           Show this help

Logging goes to stderr; set KEYFIT_LOG (or RUST_LOG) to adjust.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    State,
    Score,
    Wallets,
    Signers,
    Nodes,
}

#[derive(Debug, Clone)]
enum Click {
    Signer(SignerId),
    Wallet(WalletId),
    Node(NodeId),
    Slot(usize, Option<SignerId>),
}

#[derive(Debug)]
struct Options {
    data: Option<PathBuf>,
    policy: Option<PathBuf>,
    prefs: Option<PathBuf>,
    device: Option<Platform>,
    willingness: Option<SignerWillingness>,
    multi: bool,
    threshold: Option<Threshold>,
    command: Command,
    clicks: Vec<Click>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env("KEYFIT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("{USAGE}");
        return Ok(());
    }
    let options = parse_args(&args)?;
    run(options)
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options {
        data: None,
        policy: None,
        prefs: None,
        device: None,
        willingness: None,
        multi: false,
        threshold: None,
        command: Command::State,
        clicks: Vec::new(),
    };
    let mut command_seen = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("{flag} expects a value"))
        };
        match arg.as_str() {
            "--data" => options.data = Some(PathBuf::from(value_for("--data")?)),
            "--policy" => options.policy = Some(PathBuf::from(value_for("--policy")?)),
            "--prefs" => options.prefs = Some(PathBuf::from(value_for("--prefs")?)),
            "--device" => {
                options.device = Some(match value_for("--device")?.as_str() {
                    "mobile" => Platform::Mobile,
                    "desktop" => Platform::Desktop,
                    other => bail!("unknown device type {other:?}"),
                });
            }
            "--willingness" => {
                options.willingness = Some(match value_for("--willingness")?.as_str() {
                    "with-signer" => SignerWillingness::WithSigner,
                    "no-signer" => SignerWillingness::NoSigner,
                    other => bail!("unknown willingness {other:?}"),
                });
            }
            "--multi" => options.multi = true,
            "--threshold" => {
                options.threshold = Some(value_for("--threshold")?.parse()?);
                options.multi = true;
            }
            "state" | "score" | "wallets" | "signers" | "nodes" if !command_seen => {
                command_seen = true;
                options.command = match arg.as_str() {
                    "score" => Command::Score,
                    "wallets" => Command::Wallets,
                    "signers" => Command::Signers,
                    "nodes" => Command::Nodes,
                    _ => Command::State,
                };
            }
            click if click.contains(':') => options.clicks.push(parse_click(click)?),
            other => bail!("unexpected argument {other:?} (try --help)"),
        }
    }
    Ok(options)
}

fn parse_click(raw: &str) -> Result<Click> {
    let Some((kind, id)) = raw.split_once(':') else {
        bail!("malformed click {raw:?}");
    };
    if id.is_empty() {
        bail!("click {raw:?} is missing an item id");
    }
    if let Some(index) = kind.strip_prefix("slot") {
        let index: usize = index
            .parse()
            .with_context(|| format!("bad slot index in {raw:?}"))?;
        let signer = (id != "-").then(|| SignerId::from(id));
        return Ok(Click::Slot(index, signer));
    }
    match kind {
        "signer" => Ok(Click::Signer(SignerId::from(id))),
        "wallet" => Ok(Click::Wallet(WalletId::from(id))),
        "node" => Ok(Click::Node(NodeId::from(id))),
        other => bail!("unknown click category {other:?}"),
    }
}

fn run(options: Options) -> Result<()> {
    let dataset = match &options.data {
        Some(path) => load_dataset(path)
            .with_context(|| format!("loading dataset from {}", path.display()))?,
        None => bundled_dataset(),
    };
    let policy = match &options.policy {
        Some(path) => EnginePolicy::load(path)
            .with_context(|| format!("loading policy from {}", path.display()))?,
        None => EnginePolicy::default(),
    };
    let store = options.prefs.as_ref().map(PreferenceStore::new);

    let mut preference = store
        .as_ref()
        .and_then(PreferenceStore::load)
        .unwrap_or_default();
    if let Some(device) = options.device {
        preference = preference.with_device_type(device);
    }
    if let Some(willingness) = options.willingness {
        preference = preference.with_willingness(willingness);
    }

    let engine = Engine::new(policy);
    let mut selection = if options.multi {
        Selection::multi(options.threshold.unwrap_or(DEFAULT_THRESHOLD))
    } else {
        Selection::new()
    };

    let mut preference_dirty = false;
    for click in &options.clicks {
        let outcome = match click {
            Click::Slot(index, signer) => {
                selection = engine.set_slot(&selection, *index, signer.clone());
                continue;
            }
            Click::Signer(id) => engine.transition(&dataset, &selection, &preference, ItemRef::Signer(id)),
            Click::Wallet(id) => engine.transition(&dataset, &selection, &preference, ItemRef::Wallet(id)),
            Click::Node(id) => engine.transition(&dataset, &selection, &preference, ItemRef::Node(id)),
        };
        selection = outcome.selection;
        if let Some(update) = outcome.preference_update {
            preference = update;
            preference_dirty = true;
        }
    }

    if preference_dirty && let Some(store) = &store {
        store
            .save(&preference)
            .with_context(|| format!("saving preference to {}", store.path().display()))?;
    }

    match options.command {
        Command::State => print_board(&engine, &dataset, &selection, &preference),
        Command::Score => println!("{}", engine.completion_score(&dataset, &selection)),
        Command::Wallets => print_ids(engine.compatible_wallets(&dataset, &selection)),
        Command::Signers => print_ids(engine.compatible_signers(&dataset, &selection)),
        Command::Nodes => print_ids(engine.compatible_nodes(&dataset, &selection)),
    }
    Ok(())
}

fn print_ids(ids: Vec<impl std::fmt::Display>) {
    for id in ids {
        println!("{id}");
    }
}

fn state_marker(state: ComponentState) -> char {
    match state {
        ComponentState::Active => '*',
        ComponentState::Breathing => '~',
        ComponentState::Inactive => ' ',
    }
}

fn print_board(
    engine: &Engine,
    dataset: &Dataset,
    selection: &Selection,
    preference: &UserPreference,
) {
    if let Some(multi) = selection.as_multi() {
        let slots: Vec<String> = multi
            .slots()
            .iter()
            .map(|slot| slot.as_ref().map_or_else(|| "-".to_owned(), ToString::to_string))
            .collect();
        println!("mode: multi-sig {} [{}]", multi.threshold(), slots.join(" "));
    } else {
        println!("mode: single-sig");
    }
    println!("device: {}", preference.device_type);

    println!("signers:");
    for signer in dataset.signers() {
        let state = engine.derive_state(dataset, selection, preference, ItemRef::Signer(&signer.id));
        println!("  [{}] {:<20} {}", state_marker(state), signer.id, signer.name);
    }
    println!("wallets:");
    for wallet in dataset.wallets() {
        let state = engine.derive_state(dataset, selection, preference, ItemRef::Wallet(&wallet.id));
        println!("  [{}] {:<20} {}", state_marker(state), wallet.id, wallet.name);
    }
    println!("nodes:");
    for node in dataset.nodes() {
        let state = engine.derive_state(dataset, selection, preference, ItemRef::Node(&node.id));
        println!("  [{}] {:<20} {}", state_marker(state), node.id, node.name);
    }

    // Known transfer methods for the selected signer/wallet pair.
    if let Some(single) = selection.as_single()
        && let Some(wallet) = single.wallet()
    {
        for signer in single.signers() {
            let methods = dataset.transfer_methods(signer, wallet);
            if !methods.is_empty() {
                println!("transfer: {} -> {}: {}", signer, wallet, methods.join(", "));
            }
        }
    }

    println!("score: {}", engine.completion_score(dataset, selection));
}
