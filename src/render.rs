use std::{
    io::{self, stdout, Stdout, Write},
    thread,
    time::Duration,
};

use crossterm::{
    cursor, execute,
    style::{ContentStyle, PrintStyledContent, ResetColor},
    terminal, QueueableCommand, SynchronizedUpdate,
};
use csolver::{Block, Dims, Grid, SearchEngine};
use hashbrown::HashSet;

use crate::settings::ColorScheme;

/// What a cell is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Block(Block),
    Visited,
    Frontier,
    Path,
    Current,
}

impl Layer {
    pub fn char(self) -> char {
        match self {
            Layer::Block(block) => block.to_char(),
            Layer::Visited => '-',
            Layer::Frontier => '+',
            Layer::Path => 'x',
            Layer::Current => '@',
        }
    }

    pub fn style(self, colors: &ColorScheme) -> ContentStyle {
        match self {
            Layer::Block(Block::Wall) => colors.walls(),
            Layer::Block(Block::Start) => colors.starts(),
            Layer::Block(Block::Finish) => colors.finishes(),
            Layer::Block(Block::Empty | Block::Undefined) => colors.walkables(),
            Layer::Visited => colors.visiteds(),
            Layer::Frontier => colors.frontiers(),
            Layer::Path => colors.paths(),
            Layer::Current => colors.currents(),
        }
    }
}

/// Search state drawn over the grid.
#[derive(Debug, Default, Clone)]
pub struct Overlay {
    visited: HashSet<Dims>,
    frontier: HashSet<Dims>,
    path: HashSet<Dims>,
    current: Option<Dims>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_engine(engine: &SearchEngine, path: &[Dims]) -> Self {
        Self {
            visited: engine.visited().positions().collect(),
            frontier: engine.frontier().positions().collect(),
            path: path.iter().copied().collect(),
            current: engine.current(),
        }
    }

    /// Start and finish blocks stay visible, otherwise the current cell is drawn over the path,
    /// the path over the frontier and the frontier over the visited cells.
    pub fn layer(&self, grid: &Grid, pos: Dims) -> Layer {
        let block = grid.block(pos);
        if matches!(block, Block::Start | Block::Finish) {
            Layer::Block(block)
        } else if self.current == Some(pos) {
            Layer::Current
        } else if self.path.contains(&pos) {
            Layer::Path
        } else if self.frontier.contains(&pos) {
            Layer::Frontier
        } else if self.visited.contains(&pos) {
            Layer::Visited
        } else {
            Layer::Block(block)
        }
    }
}

pub fn render_plain(grid: &Grid, overlay: &Overlay) -> String {
    let Dims(w, h) = grid.size();
    let mut out = String::with_capacity(((w + 1) * h) as usize);
    for y in 0..h {
        out.extend((0..w).map(|x| overlay.layer(grid, Dims(x, y)).char()));
        out.push('\n');
    }
    out
}

pub fn draw(
    out: &mut impl Write,
    grid: &Grid,
    overlay: &Overlay,
    colors: &ColorScheme,
) -> io::Result<()> {
    let Dims(w, h) = grid.size();
    for y in 0..h {
        for x in 0..w {
            let layer = overlay.layer(grid, Dims(x, y));
            out.queue(PrintStyledContent(layer.style(colors).apply(layer.char())))?;
        }
        out.queue(ResetColor)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// Alternate screen showing the search after every step.
pub struct Animation {
    tty: Stdout,
    delay: Duration,
    colors: ColorScheme,
}

impl Animation {
    pub fn new(delay: Duration, colors: ColorScheme) -> io::Result<Self> {
        let mut tty = stdout();
        execute!(tty, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { tty, delay, colors })
    }

    pub fn show(&mut self, engine: &SearchEngine) -> io::Result<()> {
        let overlay = Overlay::from_engine(engine, &engine.partial_path());
        let grid = engine.grid();
        let colors = &self.colors;

        self.tty.sync_update(|tty| {
            tty.queue(cursor::MoveTo(0, 0))?;
            draw(tty, grid, &overlay, colors)?;
            writeln!(
                tty,
                "{} | iteration {} | frontier {} | visited {}",
                engine.strategy(),
                engine.iterations(),
                engine.frontier().len(),
                engine.visited().len()
            )
        })??;

        thread::sleep(self.delay);
        Ok(())
    }
}

impl Drop for Animation {
    fn drop(&mut self) {
        let _ = execute!(self.tty, cursor::Show, terminal::LeaveAlternateScreen);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use csolver::Strategy;

    use super::*;

    const MAZE: &str = "5 3\no...#\n###.#\n*....\n";

    #[test]
    fn plain_grid() {
        let grid: Grid = MAZE.parse().unwrap();
        let text = render_plain(&grid, &Overlay::new());
        assert_eq!(
            text,
            "#######\n#o...##\n####.##\n#*....#\n#######\n"
        );
    }

    #[test]
    fn solved_path_is_drawn() {
        let grid = Arc::new(MAZE.parse::<Grid>().unwrap());
        let mut engine = SearchEngine::new(grid.clone(), Strategy::BreadthFirst);
        engine.solve().unwrap();

        let path = engine.path().unwrap();
        let text = render_plain(&grid, &Overlay::from_engine(&engine, &path));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[1], "#oxxx##");
        assert_eq!(lines[2], "####x##");
        assert!(lines[3].starts_with("#*xxx"));
    }

    #[test]
    fn colored_output_contains_every_cell() {
        let grid: Grid = MAZE.parse().unwrap();
        let mut out = Vec::new();
        draw(&mut out, &grid, &Overlay::new(), &ColorScheme::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches('#').count(), 25);
        assert_eq!(text.lines().count(), 5);
    }
}
