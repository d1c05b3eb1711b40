use std::{fmt, path::Path, sync::Arc};

use csolver::{
    generator::MazeGenerator,
    search::{Outcome, SearchEngine, Strategy},
    Dims, GeneratorError, Grid,
};

use crate::{render::Animation, settings::Settings, storage, AppError};

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub seed: Option<u64>,
    pub loops: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Generated {
    pub grid: Grid,
    pub seed: u64,
    pub start: Dims,
    pub finish: Dims,
}

/// Generates a maze with loops, a start and a finish. Options override the settings.
///
/// When the start and the finish cannot be placed far enough apart, the separation is halved
/// until they fit.
pub fn generate(settings: &Settings, options: &GenerateOptions) -> Result<Generated, AppError> {
    let width = options.width.unwrap_or_else(|| settings.get_width());
    let height = options.height.unwrap_or_else(|| settings.get_height());

    let mut generator = MazeGenerator::new(options.seed);
    let mut grid = generator.generate(width, height)?;

    let loops = options
        .loops
        .unwrap_or((width + height) / settings.get_loop_divisor());
    generator.add_loops(&mut grid, loops);
    MazeGenerator::seal(&mut grid);

    let mut separation = ((width + height) / settings.get_separation_divisor()) as u32;
    let (start, finish) = loop {
        match generator.place_start_and_finish(&mut grid, separation) {
            Ok(endpoints) => break endpoints,
            Err(GeneratorError::NoPlacement { .. }) if separation > 0 => {
                log::warn!(
                    "cannot place start and finish {} apart, trying {}",
                    separation,
                    separation / 2
                );
                separation /= 2;
            }
            Err(err) => return Err(err.into()),
        }
    };

    Ok(Generated {
        grid,
        seed: generator.seed(),
        start,
        finish,
    })
}

pub fn load_or_generate(
    file: Option<&Path>,
    settings: &Settings,
    seed: Option<u64>,
) -> Result<Grid, AppError> {
    match file {
        Some(path) => Ok(storage::load_grid(path)?),
        None => {
            let generated = generate(
                settings,
                &GenerateOptions {
                    seed,
                    ..Default::default()
                },
            )?;
            log::info!("generated maze with seed {}", generated.seed);
            Ok(generated.grid)
        }
    }
}

/// Summary of one finished search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub strategy: Strategy,
    pub heuristic_visible: bool,
    pub outcome: Outcome,
    pub path_len: Option<usize>,
    pub visited: usize,
    pub frontier: usize,
    pub millis: u128,
}

impl Report {
    pub const HEADER: &'static str =
        "strategy           heuristic  result   iterations  path  visited  frontier      ms";

    pub fn from_engine(engine: &SearchEngine, outcome: Outcome) -> Self {
        Self {
            strategy: engine.strategy(),
            heuristic_visible: engine.heuristic_visible(),
            outcome,
            path_len: engine.path().map(|path| path.len()),
            visited: engine.visited().len(),
            frontier: engine.frontier().len(),
            millis: engine.elapsed_millis(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<18} {:<10} {:<8} {:>10} {:>5} {:>8} {:>9} {:>7}",
            self.strategy.name(),
            if self.heuristic_visible { "visible" } else { "hidden" },
            if self.outcome.is_found() { "found" } else { "no path" },
            self.outcome.iterations(),
            self.path_len.map_or_else(|| "-".to_string(), |len| len.to_string()),
            self.visited,
            self.frontier,
            self.millis
        )
    }
}

/// Runs one search to the end, drawing every step when `animation` is given.
pub fn search(
    grid: Arc<Grid>,
    strategy: Strategy,
    heuristic_visible: bool,
    animation: Option<&mut Animation>,
) -> Result<(SearchEngine, Report), AppError> {
    let mut engine = SearchEngine::new(grid, strategy);
    engine.set_heuristic_visible(heuristic_visible)?;

    let outcome = match animation {
        None => engine.solve()?,
        Some(animation) => {
            engine.init()?;
            animation.show(&engine)?;
            while engine.condition() {
                engine.step()?;
                animation.show(&engine)?;
            }
            engine.finish()?
        }
    };

    let report = Report::from_engine(&engine, outcome);
    Ok((engine, report))
}

/// Every strategy on the same grid, plus A* with the heuristic hidden.
pub fn compare(grid: Arc<Grid>, settings: &Settings) -> Result<Vec<Report>, AppError> {
    let runs = Strategy::ALL
        .iter()
        .map(|&strategy| (strategy, settings.get_heuristic_visible(strategy)))
        .chain([(Strategy::AStar, false)]);

    let mut reports = Vec::new();
    for (strategy, heuristic_visible) in runs {
        let (_, report) = search(grid.clone(), strategy, heuristic_visible, None)?;
        reports.push(report);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use csolver::Block;

    use super::*;

    fn seeded(seed: u64) -> GenerateOptions {
        GenerateOptions {
            width: Some(31),
            height: Some(21),
            seed: Some(seed),
            loops: None,
        }
    }

    #[test]
    fn generated_maze_is_solvable() {
        let generated = generate(&Settings::new(), &seeded(12)).unwrap();
        assert_eq!(generated.seed, 12);
        assert_eq!(generated.grid.size(), Dims(31, 21));
        assert_eq!(generated.grid.block(generated.start), Block::Start);
        assert!(generated.start.manhattan(generated.finish) >= (31 + 21) / 3);

        let (_, report) = search(Arc::new(generated.grid), Strategy::AStar, true, None).unwrap();
        assert!(report.outcome.is_found());
        assert!(report.path_len.unwrap() >= 2);
    }

    #[test]
    fn separation_shrinks_until_it_fits() {
        let settings = Settings {
            separation_divisor: Some(1),
            ..Settings::new()
        };
        let options = GenerateOptions {
            width: Some(7),
            height: Some(7),
            seed: Some(3),
            loops: Some(0),
        };
        let generated = generate(&settings, &options).unwrap();
        assert_eq!(generated.grid.starts().len(), 1);
        assert_eq!(generated.grid.finishes().len(), 1);
    }

    #[test]
    fn comparison_agrees_on_shortest_path() {
        let grid = Arc::new(generate(&Settings::new(), &seeded(8)).unwrap().grid);
        let reports = compare(grid, &Settings::new()).unwrap();
        assert_eq!(reports.len(), Strategy::ALL.len() + 1);
        assert!(reports.iter().all(|r| r.outcome.is_found()));

        let shortest = reports[0].path_len;
        for report in &reports {
            if report.strategy != Strategy::DepthFirst {
                assert_eq!(report.path_len, shortest, "{}", report);
            }
        }
        assert!(!reports[5].heuristic_visible);
    }

    #[test]
    fn report_row() {
        let grid: Grid = "3 1\no.*\n".parse().unwrap();
        let (_, report) = search(Arc::new(grid), Strategy::BreadthFirst, false, None).unwrap();
        assert_eq!(report.path_len, Some(3));
        let row = report.to_string();
        assert!(row.starts_with("bfs"));
        assert!(row.contains("found"));
        assert!(row.contains("hidden"));
    }
}
