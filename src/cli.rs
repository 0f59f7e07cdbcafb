//! Command-line interface.
//!
//! Subcommands are grouped by entity (`domain`, `skill`, `strategy`,
//! `action`, `graph`, `vertex`, `edge`). Entities below a domain are
//! addressed by code path, graph entities by graph name and VID.

use crate::db::{Connection, DbPath, Schema, DB_FILE};
use crate::domain::DomainRepository;
use crate::error::{format_code_path, Error, Result};
use crate::graph::{render, GraphDoc, GraphRepository, LinkDirection};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edugraph")]
#[command(about = "Instructional-design catalog and directed-graph editor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new edugraph project
    Init,

    /// Manage domains
    #[command(subcommand)]
    Domain(DomainCmd),

    /// Manage skills within a domain
    #[command(subcommand)]
    Skill(SkillCmd),

    /// Manage strategies within a skill
    #[command(subcommand)]
    Strategy(StrategyCmd),

    /// Manage actions within a strategy
    #[command(subcommand)]
    Action(ActionCmd),

    /// Manage graphs
    #[command(subcommand)]
    Graph(GraphCmd),

    /// Manage vertices within a graph
    #[command(subcommand)]
    Vertex(VertexCmd),

    /// Manage edges within a graph
    #[command(subcommand)]
    Edge(EdgeCmd),
}

#[derive(Subcommand)]
pub enum DomainCmd {
    /// Add a new domain
    Add {
        /// Domain name (must be unique)
        name: String,
        /// Domain description
        #[arg(long)]
        desc: Option<String>,
    },
    /// List all domains
    List,
    /// Show a domain with its skills
    Show {
        /// Domain code
        code: i64,
    },
    /// Edit a domain
    Edit {
        /// Domain code
        code: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New description
        #[arg(long)]
        desc: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SkillCmd {
    /// Add a new skill to a domain
    Add {
        /// Domain code
        domain: i64,
        /// Skill name
        name: String,
        /// Skill description
        #[arg(long)]
        desc: Option<String>,
    },
    /// List the skills of a domain
    List {
        /// Domain code
        domain: i64,
    },
    /// Show a skill with its strategies
    Show {
        /// Domain code
        domain: i64,
        /// Skill code
        code: i64,
    },
    /// Edit a skill
    Edit {
        /// Domain code
        domain: i64,
        /// Skill code
        code: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New description
        #[arg(long)]
        desc: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum StrategyCmd {
    /// Add a new strategy to a skill
    Add {
        /// Domain code
        domain: i64,
        /// Skill code
        skill: i64,
        /// Strategy name
        name: String,
        /// Problem formulation
        #[arg(long)]
        problem: Option<String>,
    },
    /// List the strategies of a domain, grouped by skill
    List {
        /// Domain code
        domain: i64,
        /// Restrict to one skill
        #[arg(long)]
        skill: Option<i64>,
    },
    /// Show a strategy with its actions
    Show {
        /// Domain code
        domain: i64,
        /// Skill code
        skill: i64,
        /// Strategy code
        code: i64,
    },
    /// Edit a strategy
    Edit {
        /// Domain code
        domain: i64,
        /// Skill code
        skill: i64,
        /// Strategy code
        code: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New problem formulation
        #[arg(long)]
        problem: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ActionCmd {
    /// Add an action to a strategy
    Add {
        /// Domain code
        domain: i64,
        /// Skill code
        skill: i64,
        /// Strategy code
        strategy: i64,
        /// What to do
        description: String,
    },
    /// List the actions of a strategy
    List {
        /// Domain code
        domain: i64,
        /// Skill code
        skill: i64,
        /// Strategy code
        strategy: i64,
    },
    /// Replace an action's description
    Edit {
        /// Domain code
        domain: i64,
        /// Skill code
        skill: i64,
        /// Strategy code
        strategy: i64,
        /// Action ordinal
        ordinal: i64,
        /// New description
        description: String,
    },
    /// Remove an action
    Remove {
        /// Domain code
        domain: i64,
        /// Skill code
        skill: i64,
        /// Strategy code
        strategy: i64,
        /// Action ordinal
        ordinal: i64,
    },
    /// Require a strategy as a prerequisite of an action
    Require {
        /// Domain code
        domain: i64,
        /// Skill code
        skill: i64,
        /// Strategy code
        strategy: i64,
        /// Action ordinal
        ordinal: i64,
        /// Skill code of the prerequisite strategy
        on_skill: i64,
        /// Strategy code of the prerequisite strategy
        on_strategy: i64,
    },
    /// Drop a prerequisite from an action
    Unrequire {
        /// Domain code
        domain: i64,
        /// Skill code
        skill: i64,
        /// Strategy code
        strategy: i64,
        /// Action ordinal
        ordinal: i64,
        /// Skill code of the prerequisite strategy
        on_skill: i64,
        /// Strategy code of the prerequisite strategy
        on_strategy: i64,
    },
}

#[derive(Subcommand)]
pub enum GraphCmd {
    /// Add a new, empty graph
    Add {
        /// Graph name (must be unique)
        name: String,
        /// Graph description
        #[arg(long)]
        desc: Option<String>,
    },
    /// List all graphs
    List,
    /// Show a graph with its vertices and edges
    Show {
        /// Graph name
        name: String,
    },
    /// Export a graph as JSON
    Export {
        /// Graph name
        name: String,
        /// Write to a file instead of stdout
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Import a graph from JSON
    Import {
        /// Read from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Create a topologically sorted copy of a graph
    Topsort {
        /// Graph name
        name: String,
        /// Name for the sorted copy
        new_name: String,
    },
    /// Insert a null point linked to every vertex without incoming edges
    NullPoint {
        /// Graph name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum VertexCmd {
    /// Add a vertex to a graph
    Add {
        /// Graph name
        graph: String,
        /// Vertex name
        name: String,
        /// Vertex description
        #[arg(long)]
        desc: Option<String>,
        /// Also add an edge from the new vertex to this VID
        #[arg(long, conflicts_with = "from")]
        to: Option<i64>,
        /// Also add an edge from this VID to the new vertex
        #[arg(long)]
        from: Option<i64>,
        /// Description for the edge added with --to or --from
        #[arg(long)]
        edge_desc: Option<String>,
    },
    /// Show a vertex with its incoming and outgoing edges
    Show {
        /// Graph name
        graph: String,
        /// Vertex VID
        vid: i64,
    },
}

#[derive(Subcommand)]
pub enum EdgeCmd {
    /// Add an edge between two vertices
    Add {
        /// Graph name
        graph: String,
        /// Source VID
        source: i64,
        /// Target VID
        target: i64,
        /// Edge description
        #[arg(long)]
        desc: Option<String>,
    },
    /// Remove the edge(s) between two vertices
    Remove {
        /// Graph name
        graph: String,
        /// Source VID
        source: i64,
        /// Target VID
        target: i64,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cmd_init(),
        Commands::Domain(cmd) => run_domain(cmd),
        Commands::Skill(cmd) => run_skill(cmd),
        Commands::Strategy(cmd) => run_strategy(cmd),
        Commands::Action(cmd) => run_action(cmd),
        Commands::Graph(cmd) => run_graph(cmd),
        Commands::Vertex(cmd) => run_vertex(cmd),
        Commands::Edge(cmd) => run_edge(cmd),
    }
}

fn domain_repo() -> Result<DomainRepository> {
    if !DbPath::default_path().exists() {
        return Err(Error::NotInitialized);
    }
    DomainRepository::open()
}

fn graph_repo() -> Result<GraphRepository> {
    if !DbPath::default_path().exists() {
        return Err(Error::NotInitialized);
    }
    GraphRepository::open()
}

/// Timestamps are stored as `YYYY-MM-DDTHH:MM:SS`; shorten to the
/// minute for display.
fn format_ts(ts: &str) -> String {
    chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S")
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| ts.to_string())
}

fn cmd_init() -> Result<()> {
    let mut conn = Connection::open_default()?;
    Schema::init(&mut conn)?;
    fs::create_dir_all(render::RENDER_DIR)?;

    println!("Initialized edugraph in current directory");
    println!("  Database: {DB_FILE}");
    println!("  Renders:  {}", render::RENDER_DIR);
    Ok(())
}

// --- domains ---

fn run_domain(cmd: DomainCmd) -> Result<()> {
    let mut repo = domain_repo()?;

    match cmd {
        DomainCmd::Add { name, desc } => {
            let domain = repo.create_domain(name, desc)?;
            println!("Created domain {}: {}", domain.code, domain.name);
        }
        DomainCmd::List => {
            for domain in repo.list_domains()? {
                println!("  [{}] {}", domain.code, domain.name);
            }
        }
        DomainCmd::Show { code } => {
            let domain = repo.get_domain(code)?;
            println!("[{}] {}", domain.code, domain.name);
            if let Some(ref desc) = domain.description {
                println!("Description: {desc}");
            }
            println!("Created:     {}", format_ts(&domain.created_at));

            let skills = repo.list_skills(code)?;
            println!("Skills:");
            for skill in skills.iter().filter(|s| !s.is_placeholder()) {
                println!(
                    "  [{}] {}",
                    format_code_path(&[domain.code, skill.code]),
                    skill.name
                );
            }
        }
        DomainCmd::Edit { code, name, desc } => {
            let domain = repo.update_domain(code, name, desc)?;
            println!("Updated domain {}: {}", domain.code, domain.name);
        }
    }
    Ok(())
}

// --- skills ---

fn run_skill(cmd: SkillCmd) -> Result<()> {
    let mut repo = domain_repo()?;

    match cmd {
        SkillCmd::Add { domain, name, desc } => {
            let skill = repo.create_skill(domain, name, desc)?;
            println!(
                "Created skill {}: {}",
                format_code_path(&[domain, skill.code]),
                skill.name
            );
        }
        SkillCmd::List { domain } => {
            for skill in repo.list_skills(domain)? {
                if skill.is_placeholder() {
                    continue;
                }
                println!("  [{}] {}", format_code_path(&[domain, skill.code]), skill.name);
            }
        }
        SkillCmd::Show { domain, code } => {
            let skill = repo.get_skill(domain, code)?;
            println!("[{}] {}", format_code_path(&[domain, skill.code]), skill.name);
            if let Some(ref desc) = skill.description {
                println!("Description: {desc}");
            }

            let strategies = repo.list_strategies_of_skill(domain, code)?;
            println!("Strategies:");
            for strategy in strategies {
                println!(
                    "  [{}] {}",
                    format_code_path(&[domain, code, strategy.code]),
                    strategy.name
                );
            }
        }
        SkillCmd::Edit {
            domain,
            code,
            name,
            desc,
        } => {
            let skill = repo.update_skill(domain, code, name, desc)?;
            println!(
                "Updated skill {}: {}",
                format_code_path(&[domain, skill.code]),
                skill.name
            );
        }
    }
    Ok(())
}

// --- strategies ---

fn run_strategy(cmd: StrategyCmd) -> Result<()> {
    let mut repo = domain_repo()?;

    match cmd {
        StrategyCmd::Add {
            domain,
            skill,
            name,
            problem,
        } => {
            let strategy = repo.create_strategy(domain, skill, name, problem)?;
            println!(
                "Created strategy {}: {}",
                format_code_path(&[domain, skill, strategy.code]),
                strategy.name
            );
        }
        StrategyCmd::List { domain, skill } => match skill {
            Some(skill) => {
                for strategy in repo.list_strategies_of_skill(domain, skill)? {
                    println!(
                        "  [{}] {}",
                        format_code_path(&[domain, skill, strategy.code]),
                        strategy.name
                    );
                }
            }
            None => {
                for (skill, strategies) in repo.list_strategies(domain)? {
                    println!("[{}] {}", format_code_path(&[domain, skill.code]), skill.name);
                    for strategy in strategies {
                        println!(
                            "  [{}] {}",
                            format_code_path(&[domain, skill.code, strategy.code]),
                            strategy.name
                        );
                    }
                }
            }
        },
        StrategyCmd::Show {
            domain,
            skill,
            code,
        } => {
            let strategy = repo.get_strategy(domain, skill, code)?;
            println!(
                "[{}] {}",
                format_code_path(&[domain, skill, strategy.code]),
                strategy.name
            );
            if let Some(ref problem) = strategy.problem_formulation {
                println!("Problem: {problem}");
            }

            let actions = repo.list_actions(domain, skill, code)?;
            println!("Actions:");
            for act in actions {
                println!("  {}. {}", act.ordinal, act.description);
                let prereqs = repo.list_prerequisites(domain, skill, code, act.ordinal)?;
                for prereq in prereqs {
                    println!(
                        "     requires {} ({})",
                        format_code_path(&[domain, prereq.skill_code, prereq.strategy_code]),
                        prereq.strategy_name
                    );
                }
            }
        }
        StrategyCmd::Edit {
            domain,
            skill,
            code,
            name,
            problem,
        } => {
            let strategy = repo.update_strategy(domain, skill, code, name, problem)?;
            println!(
                "Updated strategy {}: {}",
                format_code_path(&[domain, skill, strategy.code]),
                strategy.name
            );
        }
    }
    Ok(())
}

// --- actions ---

fn run_action(cmd: ActionCmd) -> Result<()> {
    let mut repo = domain_repo()?;

    match cmd {
        ActionCmd::Add {
            domain,
            skill,
            strategy,
            description,
        } => {
            let act = repo.add_action(domain, skill, strategy, description)?;
            println!("Added action {}: {}", act.ordinal, act.description);
        }
        ActionCmd::List {
            domain,
            skill,
            strategy,
        } => {
            for act in repo.list_actions(domain, skill, strategy)? {
                println!("  {}. {}", act.ordinal, act.description);
            }
        }
        ActionCmd::Edit {
            domain,
            skill,
            strategy,
            ordinal,
            description,
        } => {
            let act = repo.update_action(domain, skill, strategy, ordinal, description)?;
            println!("Updated action {}: {}", act.ordinal, act.description);
        }
        ActionCmd::Remove {
            domain,
            skill,
            strategy,
            ordinal,
        } => {
            repo.remove_action(domain, skill, strategy, ordinal)?;
            println!("Removed action {ordinal}");
        }
        ActionCmd::Require {
            domain,
            skill,
            strategy,
            ordinal,
            on_skill,
            on_strategy,
        } => {
            repo.require(domain, skill, strategy, ordinal, on_skill, on_strategy)?;
            println!(
                "Action {} now requires strategy {}",
                ordinal,
                format_code_path(&[domain, on_skill, on_strategy])
            );
        }
        ActionCmd::Unrequire {
            domain,
            skill,
            strategy,
            ordinal,
            on_skill,
            on_strategy,
        } => {
            repo.unrequire(domain, skill, strategy, ordinal, on_skill, on_strategy)?;
            println!(
                "Action {} no longer requires strategy {}",
                ordinal,
                format_code_path(&[domain, on_skill, on_strategy])
            );
        }
    }
    Ok(())
}

// --- graphs ---

fn run_graph(cmd: GraphCmd) -> Result<()> {
    let mut repo = graph_repo()?;

    match cmd {
        GraphCmd::Add { name, desc } => {
            let graph = repo.create_graph(name, desc)?;
            println!("Created graph '{}'", graph.name);
        }
        GraphCmd::List => {
            for graph in repo.list_graphs()? {
                println!("  {}", graph.name);
            }
        }
        GraphCmd::Show { name } => {
            let (graph, vertices, edges) = repo.graph_detail(&name)?;
            println!("Graph '{}'", graph.name);
            if let Some(ref desc) = graph.description {
                println!("Description: {desc}");
            }
            println!("Created:     {}", format_ts(&graph.created_at));
            println!(
                "Render:      {}/{}.dot (rasterize with `dot -Tpng`)",
                render::RENDER_DIR,
                graph.name
            );

            println!("Vertices:");
            for vertex in &vertices {
                println!("  {}", vertex.label());
            }
            println!("Edges:");
            for edge in &edges {
                match &edge.description {
                    Some(desc) => println!(
                        "  {} -> {} ({desc})",
                        edge.source_vid, edge.target_vid
                    ),
                    None => println!("  {} -> {}", edge.source_vid, edge.target_vid),
                }
            }
        }
        GraphCmd::Export { name, file } => {
            let doc = repo.export(&name)?;
            let json = serde_json::to_string_pretty(&doc)?;
            match file {
                Some(path) => {
                    fs::write(&path, json)?;
                    println!("Exported graph '{}' to {}", name, path.display());
                }
                None => println!("{json}"),
            }
        }
        GraphCmd::Import { file } => {
            let json = match file {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let doc: GraphDoc = serde_json::from_str(&json)?;
            let graph = repo.import(&doc)?;
            println!(
                "Imported graph '{}' ({} vertices, {} edges)",
                graph.name,
                doc.vertexes.len(),
                doc.edges.len()
            );
        }
        GraphCmd::Topsort { name, new_name } => {
            let graph = repo.topsort(&name, new_name)?;
            println!("Created sorted graph '{}' from '{name}'", graph.name);
        }
        GraphCmd::NullPoint { name } => {
            let vertex = repo.add_null_point(&name)?;
            println!("Added null point {} to graph '{name}'", vertex.label());
        }
    }
    Ok(())
}

// --- vertices ---

fn run_vertex(cmd: VertexCmd) -> Result<()> {
    let mut repo = graph_repo()?;

    match cmd {
        VertexCmd::Add {
            graph,
            name,
            desc,
            to,
            from,
            edge_desc,
        } => {
            let link = match (to, from) {
                (Some(vid), None) => Some((LinkDirection::Incoming, vid)),
                (None, Some(vid)) => Some((LinkDirection::Outgoing, vid)),
                _ => None,
            };
            match link {
                Some((direction, peer_vid)) => {
                    let (vertex, edge) = repo.add_vertex_with_edge(
                        &graph, name, desc, direction, peer_vid, edge_desc,
                    )?;
                    println!("Added vertex {} to graph '{graph}'", vertex.label());
                    println!("  with edge {} -> {}", edge.source_vid, edge.target_vid);
                }
                None => {
                    let vertex = repo.add_vertex(&graph, name, desc)?;
                    println!("Added vertex {} to graph '{graph}'", vertex.label());
                }
            }
        }
        VertexCmd::Show { graph, vid } => {
            let (vertex, incoming, outgoing) = repo.vertex_detail(&graph, vid)?;
            println!("Vertex {} in graph '{graph}'", vertex.label());
            if let Some(ref desc) = vertex.description {
                println!("Description: {desc}");
            }

            println!("Incoming:");
            for edge in &incoming {
                println!("  {} -> {}", edge.source_vid, edge.target_vid);
            }
            println!("Outgoing:");
            for edge in &outgoing {
                println!("  {} -> {}", edge.source_vid, edge.target_vid);
            }
        }
    }
    Ok(())
}

// --- edges ---

fn run_edge(cmd: EdgeCmd) -> Result<()> {
    let mut repo = graph_repo()?;

    match cmd {
        EdgeCmd::Add {
            graph,
            source,
            target,
            desc,
        } => {
            let edge = repo.add_edge(&graph, source, target, desc)?;
            println!(
                "Added edge {} -> {} to graph '{graph}'",
                edge.source_vid, edge.target_vid
            );
        }
        EdgeCmd::Remove {
            graph,
            source,
            target,
        } => {
            let removed = repo.remove_edge(&graph, source, target)?;
            println!("Removed {removed} edge(s) {source} -> {target} from graph '{graph}'");
        }
    }
    Ok(())
}
