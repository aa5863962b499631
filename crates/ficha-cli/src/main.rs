//! CLI frontend for the Ficha character sheet engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::Context;

#[derive(Parser)]
#[command(
    name = "ficha",
    about = "Ficha: tabletop character sheets with leveling, gear, money and dice",
    version,
    propagate_version = true
)]
struct Cli {
    /// JSON file holding every character
    #[arg(long, global = true, env = "FICHA_STORE", default_value = "fichas.json")]
    store: PathBuf,

    /// Player id that owns the characters
    #[arg(long, global = true, env = "FICHA_OWNER", default_value = "local")]
    owner: String,

    /// RNG seed for reproducible rolls
    #[arg(long, global = true, env = "FICHA_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new character and make it active
    Create {
        /// Character name
        name: String,

        /// Portrait image URL
        #[arg(long)]
        portrait: Option<String>,

        /// Starting force
        #[arg(long, default_value = "0")]
        force: i32,

        /// Starting speed
        #[arg(long, default_value = "0")]
        speed: i32,

        /// Starting dodge
        #[arg(long, default_value = "0")]
        dodge: i32,

        /// Starting constitution (max life is five per point)
        #[arg(long, default_value = "0")]
        constitution: i32,
    },

    /// List your characters
    List,

    /// Make a character the active one
    Use {
        /// Character name (case-insensitive)
        name: String,
    },

    /// Show the active character's sheet
    Show,

    /// Delete a character and everything it owns
    Delete {
        /// Character name
        name: String,
    },

    /// Overwrite a stat, the level, the name or the portrait of the active character
    Edit {
        /// An attribute or resistance name, `level`, `name` or `portrait`
        field: String,

        /// New value
        #[arg(allow_negative_numbers = true)]
        value: String,
    },

    /// Grant experience to the active character
    Xp {
        /// Experience points
        amount: u32,
    },

    /// Spend a point on an attribute or resistance
    Train {
        /// Attribute or resistance name
        stat: String,
    },

    /// Manage weapons
    #[command(subcommand)]
    Weapon(WeaponCommand),

    /// Manage armor
    #[command(subcommand)]
    Armor(ArmorCommand),

    /// Receive, spend, or show money
    #[command(subcommand)]
    Money(MoneyCommand),

    /// Take damage
    Damage {
        /// Life lost
        amount: u32,
    },

    /// Recover life
    Heal {
        /// Life recovered
        amount: u32,
    },

    /// Add or remove stress (negative to relieve)
    Stress {
        /// Stress delta
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },

    /// Manage and use skills
    #[command(subcommand)]
    Skill(SkillCommand),

    /// Manage the bag
    #[command(subcommand)]
    Inv(InvCommand),

    /// Roll an XdY formula
    Roll {
        /// Formula, e.g. 2d6
        formula: String,
    },

    /// Roll a d20 check against a stat
    Check {
        /// Attribute or resistance name
        stat: String,

        /// Temporary bonus (or penalty) to the target
        #[arg(default_value = "0", allow_negative_numbers = true)]
        bonus: i32,
    },
}

#[derive(Subcommand)]
enum WeaponCommand {
    /// Add or replace a weapon and equip it
    Equip {
        /// Weapon name
        name: String,
        /// Weapon level
        level: u32,
        /// Number of d6 rolled for damage
        dice: u32,
    },
    /// Delete a weapon
    Remove {
        /// Weapon name
        name: String,
    },
    /// Add to a weapon's level and dice
    Upgrade {
        /// Weapon name
        name: String,
        /// Level delta
        #[arg(allow_negative_numbers = true)]
        level: i32,
        /// Dice delta
        #[arg(default_value = "0", allow_negative_numbers = true)]
        dice: i32,
    },
    /// List weapons
    List,
}

#[derive(Subcommand)]
enum ArmorCommand {
    /// Add or replace an armor and equip it
    Equip {
        /// Armor name
        name: String,
        /// Armor level
        level: u32,
        /// Number of d6 rolled for defense
        dice: u32,
        /// Dodge bonus while equipped
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        dodge: i32,
        /// Speed bonus while equipped
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        speed: i32,
    },
    /// Delete an armor
    Remove {
        /// Armor name
        name: String,
    },
    /// Add to an armor's level, dice and bonuses
    Upgrade {
        /// Armor name
        name: String,
        /// Level delta
        #[arg(allow_negative_numbers = true)]
        level: i32,
        /// Dice delta
        #[arg(default_value = "0", allow_negative_numbers = true)]
        dice: i32,
        /// Dodge bonus delta
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        dodge: i32,
        /// Speed bonus delta
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        speed: i32,
    },
    /// List armor
    List,
}

#[derive(Subcommand)]
enum MoneyCommand {
    /// Add money, e.g. `1r 5a 200v` or `500 verde`
    Receive {
        /// Money tokens
        tokens: Vec<String>,
    },
    /// Spend money
    Spend {
        /// Money tokens
        tokens: Vec<String>,
    },
    /// Show the balance
    Balance,
}

#[derive(Subcommand)]
enum SkillCommand {
    /// Add or replace a skill
    Add {
        /// Skill name
        name: String,
        /// XdY formula (empty for none)
        formula: String,
        /// damage or heal
        #[arg(long, default_value = "damage")]
        kind: String,
        /// Free-text description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change a skill's formula, description or kind
    Edit {
        /// Skill name
        name: String,
        /// New formula
        #[arg(long)]
        formula: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New kind
        #[arg(long)]
        kind: Option<String>,
    },
    /// Delete a skill
    Remove {
        /// Skill name
        name: String,
    },
    /// List skills, optionally filtered
    List {
        /// Substring of name or description
        filter: Option<String>,
    },
    /// Show one skill
    Info {
        /// Skill name
        name: String,
    },
    /// Use a skill; heals land on the target (default: yourself)
    Use {
        /// Skill name
        name: String,
        /// Target character name
        target: Option<String>,
    },
}

#[derive(Subcommand)]
enum InvCommand {
    /// Show the bag
    List,
    /// Add items
    Add {
        /// Item name
        item: String,
        /// How many
        #[arg(default_value = "1")]
        quantity: u32,
    },
    /// Use up items
    Use {
        /// Item name
        item: String,
        /// How many
        #[arg(default_value = "1")]
        quantity: u32,
    },
    /// Add bag slots
    Expand {
        /// Slots to add
        #[arg(default_value = "1")]
        slots: u32,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result =
        Context::open(&cli.store, &cli.owner, cli.seed).and_then(|ctx| run(&ctx, cli.command));

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(ctx: &Context, command: Commands) -> Result<(), String> {
    use commands::{character, dice, gear, inventory, money, progress, skill, vitals};

    match command {
        Commands::Create {
            name,
            portrait,
            force,
            speed,
            dodge,
            constitution,
        } => character::create(ctx, &name, portrait, [force, speed, dodge, constitution]),
        Commands::List => character::list(ctx),
        Commands::Use { name } => character::select(ctx, &name),
        Commands::Show => character::show(ctx),
        Commands::Delete { name } => character::delete(ctx, &name),
        Commands::Edit { field, value } => character::edit(ctx, &field, &value),
        Commands::Xp { amount } => progress::xp(ctx, amount),
        Commands::Train { stat } => progress::train(ctx, &stat),
        Commands::Weapon(cmd) => match cmd {
            WeaponCommand::Equip { name, level, dice } => {
                gear::equip_weapon(ctx, &name, level, dice)
            }
            WeaponCommand::Remove { name } => gear::remove_weapon(ctx, &name),
            WeaponCommand::Upgrade { name, level, dice } => {
                gear::upgrade_weapon(ctx, &name, level, dice)
            }
            WeaponCommand::List => gear::list_weapons(ctx),
        },
        Commands::Armor(cmd) => match cmd {
            ArmorCommand::Equip {
                name,
                level,
                dice,
                dodge,
                speed,
            } => gear::equip_armor(ctx, &name, level, dice, dodge, speed),
            ArmorCommand::Remove { name } => gear::remove_armor(ctx, &name),
            ArmorCommand::Upgrade {
                name,
                level,
                dice,
                dodge,
                speed,
            } => gear::upgrade_armor(ctx, &name, level, dice, dodge, speed),
            ArmorCommand::List => gear::list_armors(ctx),
        },
        Commands::Money(cmd) => match cmd {
            MoneyCommand::Receive { tokens } => money::receive(ctx, &tokens),
            MoneyCommand::Spend { tokens } => money::spend(ctx, &tokens),
            MoneyCommand::Balance => money::balance(ctx),
        },
        Commands::Damage { amount } => vitals::damage(ctx, amount),
        Commands::Heal { amount } => vitals::heal(ctx, amount),
        Commands::Stress { delta } => vitals::stress(ctx, delta),
        Commands::Skill(cmd) => match cmd {
            SkillCommand::Add {
                name,
                formula,
                kind,
                description,
            } => skill::add(ctx, &name, &formula, &kind, &description),
            SkillCommand::Edit {
                name,
                formula,
                description,
                kind,
            } => skill::edit(ctx, &name, formula, description, kind.as_deref()),
            SkillCommand::Remove { name } => skill::remove(ctx, &name),
            SkillCommand::List { filter } => skill::list(ctx, filter.as_deref()),
            SkillCommand::Info { name } => skill::info(ctx, &name),
            SkillCommand::Use { name, target } => skill::use_skill(ctx, &name, target.as_deref()),
        },
        Commands::Inv(cmd) => match cmd {
            InvCommand::List => inventory::list(ctx),
            InvCommand::Add { item, quantity } => inventory::add(ctx, &item, quantity),
            InvCommand::Use { item, quantity } => inventory::use_item(ctx, &item, quantity),
            InvCommand::Expand { slots } => inventory::expand(ctx, slots),
        },
        Commands::Roll { formula } => dice::roll(ctx, &formula),
        Commands::Check { stat, bonus } => dice::check(ctx, &stat, bonus),
    }
}
