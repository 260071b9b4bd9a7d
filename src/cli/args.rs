use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::entities::{PurchaseTab, Role};

#[derive(Parser, Debug)]
#[command(name = "brainboost", version, about = "Brain Boost quiz platform client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Signup(SignUpArgs),
    /// Sign in and print the access token
    Signin {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Revoke the current access token
    Signout,
    /// Show the quiz behind an access code
    Lookup { code: String },
    /// Join a quiz by access code
    Join {
        code: String,
        /// Stay in the waiting room until the host starts the quiz
        #[arg(short, long)]
        wait: bool,
    },
    /// Print the navigation menu for the current user
    Menu,
    /// Browse the rewards shop
    Shop {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Buy a product with points
    Buy { product_id: String },
    /// Purchase history
    Purchases {
        #[arg(short, long, default_value = "all", value_parser = parse_tab)]
        tab: PurchaseTab,
    },
    /// Admin tables
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Args, Debug)]
pub struct SignUpArgs {
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub password: String,
    #[arg(short, long)]
    pub username: String,
    #[arg(short, long, value_enum, default_value_t = RoleArg::Student)]
    pub role: RoleArg,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    Student,
    Teacher,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Student => Role::Student,
            RoleArg::Teacher => Role::Teacher,
            RoleArg::Admin => Role::Admin,
        }
    }
}

fn parse_tab(raw: &str) -> Result<PurchaseTab, String> {
    PurchaseTab::from_str(&raw.to_lowercase())
        .ok_or_else(|| format!("unknown tab '{}' (all, pending, completed, cancelled)", raw))
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    #[command(subcommand)]
    Products(ProductCommand),
    #[command(subcommand)]
    Categories(CategoryCommand),
}

#[derive(Args, Debug, Default)]
pub struct TableArgs {
    #[arg(short, long, default_value = "")]
    pub search: String,
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    List(TableArgs),
    /// Create a product, or update one with --id
    Save {
        #[arg(long)]
        id: Option<String>,
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(long)]
        points: Option<i64>,
        #[arg(long, default_value = "")]
        image_url: String,
        /// Image file to upload
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a product and its purchases
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    List(TableArgs),
    /// Create a category, or rename one with --id
    Save {
        #[arg(long)]
        id: Option<String>,
        name: String,
    },
    /// Delete a category and its posts
    Delete { id: String },
}
