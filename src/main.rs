use docopt::Docopt;
use itertools::Itertools;
use serde_derive::Deserialize;
use perfect_mazes::{
    builder::{MazeBuilder, MazeParameters},
    cells::GridCoordinate,
    grid::Grid,
    grid_displays::{GridDisplay, GridText, PathDisplay, StartEndPointsDisplay},
    renderers,
};
use std::{
    io,
    io::prelude::*,
    fs::File,
};
use tracing::{info, Level};

const USAGE: &str = "Perfect Mazes

Usage:
    perfect_mazes_driver -h | --help
    perfect_mazes_driver [--rows=<r>] [--cols=<c>] [--cell-size=<n>] [--complexity=<x>] [--difficulty=<d>] [--seed=<s>] [--show-path] [--text-out=<path>] [--image-out=<path>] [--save-edges=<path>] [--verbose]

Options:
    -h --help              Show this screen.
    --rows=<r>             Number of rows of cells, at least 2 [default: 25].
    --cols=<c>             Number of columns of cells, at least 2 [default: 25].
    --cell-size=<n>        Pixel length of one cell side in image output [default: 18].
    --complexity=<x>       0 to 1. How twisty the passages are: 0 long tunnels, 1 many short branches [default: 0.75].
    --difficulty=<d>       0 to 1. How far apart the start and end are: below 0.1 side by side, below 0.5 opposite corners, otherwise the two ends of the longest path [default: 0.9].
    --seed=<s>             Seed for the random source. A random seed is chosen and logged if not given.
    --show-path            Show the route from the start to the end.
    --text-out=<path>      Output file path for a textual rendering of the maze.
    --image-out=<path>     Output file path for an image rendering of the maze. Always PNG format.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based row-major vertex indices.
    --verbose              Log generation details to stderr.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_rows: usize,
    flag_cols: usize,
    flag_cell_size: u32,
    flag_complexity: f64,
    flag_difficulty: f64,
    flag_seed: Option<u64>,
    flag_show_path: bool,
    flag_text_out: String,
    flag_image_out: String,
    flag_save_edges: String,
    flag_verbose: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            Io(::std::io::Error);
            ImageSaveError(::image::ImageError);
            Maze(::perfect_mazes::MazeError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let log_level = if args.flag_verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .init();

    let params = MazeParameters {
        rows: args.flag_rows,
        cols: args.flag_cols,
        cell_size: args.flag_cell_size,
        complexity: args.flag_complexity,
        difficulty: args.flag_difficulty,
    };
    let mut maze = match args.flag_seed {
        Some(seed) => MazeBuilder::with_seed(params, seed),
        None => MazeBuilder::new(params),
    }.chain_err(|| "Invalid maze options")?;
    info!(seed = maze.seed(), "building maze, rerun with --seed to reproduce it");

    maze.generate()?;
    let grid = maze.grid()?;
    let (start, end) = maze.endpoints()?;

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(grid, &args.flag_save_edges)?;
    }

    let path = if args.flag_show_path {
        Some(maze.solution_path()?)
    } else {
        None
    };

    let do_image_render = !args.flag_image_out.is_empty();
    let do_text_render = !do_image_render || !args.flag_text_out.is_empty();

    if do_text_render {
        let text = text_rendering(grid, start, end, path.as_ref().map(|p| p.as_slice()));

        if args.flag_text_out.is_empty() {
            println!("{}", text);
        } else {
            write_text_to_file(&text, &args.flag_text_out)
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        }
    }

    if do_image_render {
        let render_options = renderers::RenderOptionsBuilder::new()
            .mark_start_end(true)
            .path(path.as_ref().map(|p| p.as_slice()))
            .build();
        let img = renderers::render_maze_image(&maze, &render_options)?;
        img.save(&args.flag_image_out)
            .chain_err(|| format!("Failed to write maze to image file {}", args.flag_image_out))?;
        info!(path = %args.flag_image_out, width = img.width(), height = img.height(), "saved maze image");
    }

    Ok(())
}

fn text_rendering(grid: &Grid,
                  start: GridCoordinate,
                  end: GridCoordinate,
                  path: Option<&[GridCoordinate]>)
                  -> String {

    let display: Box<dyn GridDisplay> = match path {
        Some(route) => Box::new(PathDisplay::new(route)),
        None => Box::new(StartEndPointsDisplay::new(start, end)),
    };
    GridText::new(grid, Some(display.as_ref())).to_string()
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(grid: &Grid, file_path: &str) -> Result<()> {

    let edges = grid.iter_links()
        .filter_map(|(src, dst)| {
            let index_a = grid.grid_coordinate_to_index(src)?;
            let index_b = grid.grid_coordinate_to_index(dst)?;
            Some(format!("{} {}", index_a + 1, index_b + 1))
        })
        .collect::<Vec<String>>();

    let mut graph_data = format!("{} {}\n", grid.size(), edges.len());
    graph_data.push_str(&edges.iter().join("\n"));
    graph_data.push('\n');

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
