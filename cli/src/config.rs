use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "category-graph",
    version,
    about = "Category tree queries, similarity management and rabbit-hole analysis"
)]
pub struct CliArgs {
    /// JSON data file holding categories and similarities (created on first write)
    #[arg(long, default_value = "categories.json", env = "CATEGORY_GRAPH_DATA")]
    pub data: PathBuf,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long, default_value = "warn", env = "CATEGORY_GRAPH_LOG_LEVEL")]
    pub log_level: String,

    /// Indent JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Tree query: subcategories, siblings, leaves or descendants of a category
    Tree {
        id: u64,
        /// Query kind
        kind: String,
    },

    /// Manage similarities between categories
    #[command(subcommand)]
    Similar(SimilarCommand),

    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Find the longest similar rabbit hole and the similarity islands
    RabbitHole {
        /// Print a plain-text summary instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// Show counts and the data generation
    Status,
}

#[derive(Subcommand, Debug)]
pub enum SimilarCommand {
    /// Mark two categories as similar
    Add { first: u64, second: u64 },
    /// List similarities touching a category
    List { id: u64 },
    /// Remove the similarity between two categories
    Rm { first: u64, other: u64 },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// Create a category
    Add(NewCategoryArgs),
    /// Change name, description or parent
    Update(UpdateCategoryArgs),
    /// Delete a category, its subtree and their similarities
    Rm { id: u64 },
    /// Show one category
    Show { id: u64 },
    /// List all categories
    List,
    /// Attach an image reference, or clear it
    Image {
        id: u64,
        /// Image path or URI
        #[arg(required_unless_present = "clear")]
        reference: Option<String>,
        #[arg(long, conflicts_with = "reference")]
        clear: bool,
    },
}

#[derive(Args, Debug)]
pub struct NewCategoryArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub parent: Option<u64>,
}

#[derive(Args, Debug)]
pub struct UpdateCategoryArgs {
    pub id: u64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "root")]
    pub parent: Option<u64>,
    /// Move the category to the root level
    #[arg(long)]
    pub root: bool,
}
