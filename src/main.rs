use std::{
    io::{self, IsTerminal},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use clap::{Parser, Subcommand};
use csolver::Strategy;
use msolver::{
    commands::{self, GenerateOptions, Report},
    logging,
    render::{self, Animation, Overlay},
    settings::Settings,
    storage, AppError,
};

#[derive(Parser, Debug)]
#[clap(version, author, about, name = "msolver")]
struct Args {
    #[clap(short, long, action = clap::ArgAction::Count, global = true, help = "More logging, repeat for even more")]
    verbose: u8,
    #[clap(long, global = true, help = "Use this settings file instead of the default one")]
    config: Option<PathBuf>,
    #[clap(long, action, help = "Show config path and quit")]
    show_config_path: bool,
    #[clap(long, action, help = "Reset config to default and quit")]
    reset_config: bool,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a maze and print or save it
    Generate {
        #[clap(long)]
        width: Option<usize>,
        #[clap(long)]
        height: Option<usize>,
        #[clap(long)]
        seed: Option<u64>,
        #[clap(long, help = "Number of extra passages, defaults to (width + height) / loop divisor")]
        loops: Option<usize>,
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Solve a maze file, or a freshly generated maze
    Solve {
        file: Option<PathBuf>,
        #[clap(short, long, help = "astar, concurrent-astar, bfs or dfs")]
        strategy: Option<Strategy>,
        #[clap(long, help = "Hide the distance to the goal, A* becomes Dijkstra")]
        blind: bool,
        #[clap(long, value_name = "MS", help = "Draw every step, waiting MS milliseconds in between")]
        animate: Option<Option<u64>>,
        #[clap(long)]
        seed: Option<u64>,
    },
    /// Run every strategy on the same maze
    Compare {
        file: Option<PathBuf>,
        #[clap(long)]
        seed: Option<u64>,
    },
}

fn print_grid(grid: &csolver::Grid, overlay: &Overlay, settings: &Settings) -> Result<(), AppError> {
    let mut stdout = io::stdout();
    if stdout.is_terminal() {
        render::draw(&mut stdout, grid, overlay, &settings.get_colors())?;
    } else {
        print!("{}", render::render_plain(grid, overlay));
    }
    Ok(())
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    logging::init(args.verbose)?;

    let settings_path = match args.config.or_else(Settings::default_path) {
        Some(path) => path,
        None => return Err(AppError::NoConfigDir),
    };

    if args.reset_config {
        Settings::reset_config(&settings_path)?;
        return Ok(());
    }

    if args.show_config_path {
        if let Some(s) = settings_path.to_str() {
            println!("{}", s);
        } else {
            println!("{:?}", settings_path);
        }
        return Ok(());
    }

    better_panic::install();

    let settings = Settings::load(&settings_path)?;

    match args.command.unwrap_or(Command::Solve {
        file: None,
        strategy: None,
        blind: false,
        animate: None,
        seed: None,
    }) {
        Command::Generate {
            width,
            height,
            seed,
            loops,
            output,
        } => {
            let generated = commands::generate(
                &settings,
                &GenerateOptions {
                    width,
                    height,
                    seed,
                    loops,
                },
            )?;
            log::info!(
                "seed {}, start {}, finish {}",
                generated.seed,
                generated.start,
                generated.finish
            );

            match output {
                Some(path) => storage::save_grid(&generated.grid, &path)?,
                None => print!("{}", generated.grid),
            }
        }
        Command::Solve {
            file,
            strategy,
            blind,
            animate,
            seed,
        } => {
            let grid = Arc::new(commands::load_or_generate(file.as_deref(), &settings, seed)?);
            let strategy = strategy.unwrap_or_else(|| settings.get_strategy());
            let heuristic_visible = !blind && settings.get_heuristic_visible(strategy);

            let (engine, report) = match animate {
                Some(delay) => {
                    let delay = delay.unwrap_or_else(|| settings.get_animation_delay_ms());
                    let mut animation =
                        Animation::new(Duration::from_millis(delay), settings.get_colors())?;
                    commands::search(grid.clone(), strategy, heuristic_visible, Some(&mut animation))?
                }
                None => commands::search(grid.clone(), strategy, heuristic_visible, None)?,
            };

            let path = engine.path().unwrap_or_default();
            print_grid(&grid, &Overlay::from_engine(&engine, &path), &settings)?;
            println!("{}", Report::HEADER);
            println!("{}", report);
        }
        Command::Compare { file, seed } => {
            let grid = Arc::new(commands::load_or_generate(file.as_deref(), &settings, seed)?);
            print_grid(&grid, &Overlay::new(), &settings)?;

            println!("{}", Report::HEADER);
            for report in commands::compare(grid, &settings)? {
                println!("{}", report);
            }
        }
    }

    Ok(())
}
