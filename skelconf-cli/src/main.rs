use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use skelconf_core::export::SkeletonExport;
use skelconf_core::notify::{ConfigObserver, ObserverResult};
use skelconf_core::profile::YamlStore;
use skelconf_core::{BoneNode, NodeOffsets, OffsetParam, SkeletonConfig, ToggleParam, ValueParam, Vec3, VERSION};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "skelconf", version = VERSION, about = "Inspect and edit avatar skeleton profiles")]
struct Cli {
    /// Print every observer notification as it fires
    #[arg(long, global = true)]
    trace: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every parameter with its effective value
    Show { profile: PathBuf },
    /// Print computed node offsets
    Offsets {
        profile: PathBuf,
        /// Print as a parent/child tree with absolute positions
        #[arg(long)]
        tree: bool,
        /// Print as JSON
        #[arg(long, conflicts_with = "tree")]
        json: bool,
    },
    /// Set one parameter by key or display name and save the profile
    Set {
        profile: PathBuf,
        key: String,
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
        /// Remove the override instead
        #[arg(long, conflicts_with = "value")]
        unset: bool,
    },
    /// Restore all defaults and save the profile
    Reset { profile: PathBuf },
}

struct TraceObserver;

impl ConfigObserver for TraceObserver {
    fn on_offset_changed(&self, param: OffsetParam, value: f32) -> ObserverResult {
        println!("  ~ {} = {value}", param.key());
        Ok(())
    }
    fn on_toggle_changed(&self, param: ToggleParam, value: bool) -> ObserverResult {
        println!("  ~ {} = {value}", param.key());
        Ok(())
    }
    fn on_value_changed(&self, param: ValueParam, value: f32) -> ObserverResult {
        println!("  ~ {} = {value}", param.key());
        Ok(())
    }
    fn on_node_offset_changed(&self, bone: BoneNode, o: Vec3) -> ObserverResult {
        println!("  ~ node {bone} = ({:.3}, {:.3}, {:.3})", o.x, o.y, o.z);
        Ok(())
    }
}

fn open(path: &Path, trace: bool) -> Result<(YamlStore, SkeletonConfig)> {
    let store = YamlStore::load(path).with_context(|| format!("reading {}", path.display()))?;
    let observer: Option<Box<dyn ConfigObserver>> = if trace { Some(Box::new(TraceObserver)) } else { None };
    let mut cfg = SkeletonConfig::builder().boxed_observer(observer).build();
    cfg.load_from(&store);
    Ok((store, cfg))
}

fn save(mut store: YamlStore, cfg: &SkeletonConfig, path: &Path) -> Result<()> {
    cfg.save_to(&mut store);
    store.save(path).with_context(|| format!("writing {}", path.display()))?;
    info!("saved {}", path.display());
    Ok(())
}

fn mark(overridden: bool) -> &'static str { if overridden { "*" } else { " " } }

fn show(cfg: &SkeletonConfig) {
    let o = cfg.overrides();
    println!("Offsets (meters):");
    for p in OffsetParam::ALL {
        println!(" {} {:<28} {:>8.3}", mark(o.offsets.contains_key(&p)), p.key(), cfg.offset(p));
    }
    println!("Toggles:");
    for p in ToggleParam::ALL {
        println!(" {} {:<28} {:>8}", mark(o.toggles.contains_key(&p)), p.key(), cfg.toggle(p));
    }
    println!("Values:");
    for p in ValueParam::ALL {
        println!(" {} {:<40} {:>8.3}", mark(o.values.contains_key(&p)), p.key(), cfg.value(p));
    }
}

fn print_tree(offsets: &NodeOffsets, bone: BoneNode, depth: usize) {
    let o = offsets.get(bone);
    let w = offsets.world_position(bone);
    println!(
        "{:indent$}{bone}: offset=({:.3}, {:.3}, {:.3}) pos=({:.3}, {:.3}, {:.3})",
        "", o.x, o.y, o.z, w.x, w.y, w.z,
        indent = depth * 2
    );
    for child in bone.children() {
        print_tree(offsets, child, depth + 1);
    }
}

fn set(cfg: &mut SkeletonConfig, key: &str, value: Option<&str>) -> Result<()> {
    if let Some(p) = OffsetParam::from_key(key) {
        let v = value.map(str::parse::<f32>).transpose().with_context(|| format!("{key} takes a number"))?;
        cfg.set_offset_auto(p, v);
    } else if let Some(p) = ToggleParam::from_key(key) {
        let v = value.map(str::parse::<bool>).transpose().with_context(|| format!("{key} takes true/false"))?;
        cfg.set_toggle(p, v);
    } else if let Some(p) = ValueParam::from_key(key) {
        let v = value.map(str::parse::<f32>).transpose().with_context(|| format!("{key} takes a number"))?;
        cfg.set_value(p, v);
    } else {
        bail!("unknown config key: {key}");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Show { profile } => {
            let (_, cfg) = open(&profile, cli.trace)?;
            show(&cfg);
        }
        Command::Offsets { profile, tree, json } => {
            let (_, cfg) = open(&profile, cli.trace)?;
            if json {
                println!("{}", SkeletonExport::from_config(&cfg).to_json()?);
            } else if tree {
                print_tree(&cfg.node_offsets(), BoneNode::Head, 0);
            } else {
                for (bone, o) in cfg.node_offsets().iter() {
                    println!("{:<20} ({:>7.3}, {:>7.3}, {:>7.3})", bone.name(), o.x, o.y, o.z);
                }
            }
        }
        Command::Set { profile, key, value, unset } => {
            if value.is_none() && !unset {
                bail!("give a value or --unset");
            }
            let (store, mut cfg) = open(&profile, cli.trace)?;
            set(&mut cfg, &key, value.as_deref())?;
            save(store, &cfg, &profile)?;
        }
        Command::Reset { profile } => {
            let (store, mut cfg) = open(&profile, cli.trace)?;
            cfg.reset_configs();
            save(store, &cfg, &profile)?;
        }
    }
    Ok(())
}
