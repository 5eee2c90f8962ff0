use arboard::Clipboard;
use macroquad::prelude::*;
use pathviz::config::Config;
use pathviz::logging::init_logging;
use pathviz::{AStar, CellState, Coord, Grid, SearchOutcome, Step};
use std::sync::OnceLock;
use tracing::{info, warn};

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Configuration, read once. The subscriber is installed first so load messages are kept.
fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let log_handle = init_logging("info");
        let config = Config::load();
        if let Some(handle) = log_handle {
            handle.set_filter(&config.logging.filter);
        }
        config
    })
}

fn state_color(state: CellState) -> Color {
    match state {
        CellState::Empty => WHITE,
        CellState::Start => Color::from_rgba(255, 165, 0, 255),
        CellState::End => Color::from_rgba(128, 0, 128, 255),
        CellState::Barrier => BLACK,
        CellState::Frontier => Color::from_rgba(0, 255, 0, 255),
        CellState::Visited => Color::from_rgba(255, 0, 0, 255),
        CellState::Path => Color::from_rgba(64, 224, 208, 255),
    }
}

const LINE_COLOR: Color = Color::new(0.5, 0.5, 0.5, 1.0);

/// Visualization state
struct VisState {
    config: &'static Config,
    grid: Grid,
    search: Option<AStar>,
}

impl VisState {
    fn new(config: &'static Config) -> Self {
        let grid = Grid::new(config.grid.rows, config.grid.width);
        VisState {
            config,
            grid,
            search: None,
        }
    }

    fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    fn cell_at(&self, mouse_x: f32, mouse_y: f32) -> Option<Coord> {
        let width = self.grid.cell_width() as f32;
        if mouse_x < 0.0 || mouse_y < 0.0 || width <= 0.0 {
            return None;
        }
        let coord = Coord::new((mouse_y / width) as usize, (mouse_x / width) as usize);
        self.grid.contains(coord).then_some(coord)
    }

    fn handle_mouse(&mut self) {
        let (mouse_x, mouse_y) = mouse_position();
        let Some(coord) = self.cell_at(mouse_x, mouse_y) else {
            return;
        };

        let result = if is_mouse_button_down(MouseButton::Left) {
            self.grid.paint(coord).map(|_| ())
        } else if is_mouse_button_down(MouseButton::Right) {
            self.grid.erase(coord)
        } else {
            Ok(())
        };
        if let Err(e) = result {
            warn!(error = %e, "edit rejected");
        }
    }

    fn start_search(&mut self) {
        self.grid.clear_search_marks();
        self.grid.compute_adjacency();
        match AStar::new(
            &self.grid,
            self.grid.start(),
            self.grid.end(),
            self.config.search.heuristic,
        ) {
            Ok(search) => {
                info!(start = ?search.start(), end = ?search.end(), "search started");
                self.search = Some(search);
            }
            Err(e) => warn!(error = %e, "cannot start search"),
        }
    }

    fn advance_search(&mut self) {
        let Some(search) = self.search.as_mut() else {
            return;
        };
        for _ in 0..self.config.search.steps_per_frame {
            if let Step::Finished(_) = search.step(&mut self.grid) {
                self.finish_search();
                return;
            }
        }
    }

    fn cancel_search(&mut self) {
        if let Some(search) = self.search.as_mut() {
            search.cancel(&mut self.grid);
            self.finish_search();
        }
    }

    fn finish_search(&mut self) {
        let Some(search) = self.search.take() else {
            return;
        };
        let stats = search.stats();
        match search.outcome() {
            Some(SearchOutcome::Found { path }) => {
                info!(length = path.len() + 1, expanded = stats.expanded, "path found")
            }
            Some(SearchOutcome::NoPath) => info!(expanded = stats.expanded, "no path exists"),
            Some(SearchOutcome::Cancelled) | None => info!("search cancelled"),
        }

        if let Some(path) = &self.config.logging.trace_path {
            match search.trace().save_to_file(path) {
                Ok(()) => info!(path = %path, "search trace written"),
                Err(e) => warn!(path = %path, error = %e, "failed to write search trace"),
            }
        }
    }

    fn reset(&mut self) {
        self.search = None;
        self.grid = Grid::new(self.config.grid.rows, self.config.grid.width);
        info!("grid reset");
    }

    fn copy_to_clipboard(&self) {
        let grid_string = self.grid.to_ascii();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(grid_string) {
                    warn!(error = %e, "failed to copy to clipboard");
                } else {
                    info!("grid layout copied to clipboard");
                    // Keep clipboard alive for a moment so clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => warn!(error = %e, "failed to access clipboard"),
        }
    }

    fn draw(&self) {
        clear_background(WHITE);

        let width = self.grid.cell_width() as f32;
        for cell in self.grid.cells() {
            let px = cell.column as f32 * width;
            let py = cell.row as f32 * width;
            draw_rectangle(px, py, width, width, state_color(cell.state));
        }

        let extent = width * self.grid.size() as f32;
        for i in 0..=self.grid.size() {
            let offset = i as f32 * width;
            draw_line(0.0, offset, extent, offset, 1.0, LINE_COLOR);
            draw_line(offset, 0.0, offset, extent, 1.0, LINE_COLOR);
        }
    }
}

fn window_conf() -> Conf {
    let config = config();
    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: config.grid.width as i32,
        window_height: config.grid.width as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = config();

    println!("1- Left-click a square to select the start node");
    println!("2- Left-click another square to select the end node");
    println!("3- Hold the left-click and drag to draw barriers, right-click to erase");
    println!("4- Press SPACE to run, DELETE to reset, C to copy the grid");

    prevent_quit();
    let mut state = VisState::new(config);

    loop {
        let quit = is_quit_requested();

        if state.is_searching() {
            if quit || is_key_pressed(KeyCode::Escape) {
                state.cancel_search();
            } else {
                state.advance_search();
            }
        } else {
            if quit || is_key_pressed(KeyCode::Escape) {
                break;
            }
            if is_mouse_button_down(MouseButton::Left) || is_mouse_button_down(MouseButton::Right) {
                state.handle_mouse();
            }
            if is_key_pressed(KeyCode::Space) {
                state.start_search();
            }
            if is_key_pressed(KeyCode::Delete) || is_key_pressed(KeyCode::Backspace) {
                state.reset();
            }
            if is_key_pressed(KeyCode::C) {
                state.copy_to_clipboard();
            }
        }

        state.draw();

        if quit && !state.is_searching() {
            break;
        }

        next_frame().await
    }
}
