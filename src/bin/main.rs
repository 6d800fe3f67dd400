//! Voxel Mesher CLI
//!
//! Generate, inspect and mesh voxel grid snapshots.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use voxel_mesher::grid::{generate, snapshot};
use voxel_mesher::{
    export_raw, CellModel, Channel, Grid, GridShape, Mesher, MesherConfig, MesherOutput,
    ObjExport, TextureAtlas,
};

#[derive(Parser)]
#[command(name = "voxel-mesher")]
#[command(author, version, about = "Generate textured meshes from voxel grids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mesh a grid snapshot and export the result
    Mesh {
        /// Grid snapshot file; a fallback grid is used if it cannot be read
        #[arg(short, long)]
        grid: PathBuf,

        #[command(flatten)]
        world: WorldArgs,

        /// Fill the fallback grid randomly instead of leaving it empty
        #[arg(long)]
        random: bool,

        /// Seed for the random fallback fill
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Texture atlas image, copied next to OBJ output
        #[arg(short, long)]
        atlas: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Base name of the output files
        #[arg(short, long, default_value = "mesh")]
        name: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "raw")]
        format: OutputFormat,
    },

    /// Write a randomly filled grid snapshot
    Generate {
        #[command(flatten)]
        world: WorldArgs,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Number of distinct texture codes (defaults to the group count or 160 for maps)
        #[arg(long)]
        codes: Option<u16>,

        /// Output snapshot file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show shape and code counts of a grid snapshot
    Info {
        /// Grid snapshot file
        #[arg(short, long)]
        grid: PathBuf,

        #[command(flatten)]
        world: WorldArgs,
    },
}

#[derive(Args)]
struct WorldArgs {
    /// Preset for cell model, UV mapping and shading
    #[arg(long, value_enum, default_value = "cube")]
    variant: Variant,

    /// JSON mesher config, replacing the preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Half extent along x and z (and y for cube grids)
    #[arg(long)]
    radius: Option<u32>,

    /// Height of map grids
    #[arg(long)]
    height: Option<u32>,
}

impl WorldArgs {
    fn config(&self) -> Result<MesherConfig, Box<dyn std::error::Error>> {
        match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)?;
                Ok(MesherConfig::from_json(&json)?)
            }
            None => Ok(match self.variant {
                Variant::Cube => MesherConfig::cube_variant(),
                Variant::Map => MesherConfig::map_variant(),
                Variant::MapShadows => MesherConfig::map_variant_with_shadows(),
            }),
        }
    }

    fn shape(&self, model: CellModel) -> voxel_mesher::Result<GridShape> {
        match model {
            CellModel::Single => GridShape::try_cube(self.radius.unwrap_or(25)),
            CellModel::TwoMaterial => {
                GridShape::try_floor(self.radius.unwrap_or(128), self.height.unwrap_or(16))
            }
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// Single-material cubes, one texture per group
    Cube,
    /// Two-material map over one atlas
    Map,
    /// Two-material map with distance falloff and shadows
    MapShadows,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Interleaved little-endian vertex buffer plus JSON manifest
    Raw,
    /// Wavefront OBJ format
    Obj,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Mesh {
            grid,
            world,
            random,
            seed,
            atlas,
            output,
            name,
            format,
        } => {
            mesh_snapshot(&grid, &world, random, seed, atlas.as_deref(), &output, &name, format)?;
        }
        Commands::Generate {
            world,
            seed,
            codes,
            output,
        } => {
            generate_snapshot(&world, seed, codes, &output)?;
        }
        Commands::Info { grid, world } => {
            show_grid_info(&grid, &world)?;
        }
    }

    Ok(())
}

fn default_codes(config: &MesherConfig) -> u16 {
    match config.cell_model {
        CellModel::Single => config.group_labels.len().clamp(1, u16::MAX as usize) as u16,
        CellModel::TwoMaterial => generate::DEFAULT_FLOOR_CODES,
    }
}

#[allow(clippy::too_many_arguments)]
fn mesh_snapshot(
    grid_path: &Path,
    world: &WorldArgs,
    random: bool,
    seed: u64,
    atlas_path: Option<&Path>,
    output_dir: &Path,
    name: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = world.config()?;
    let model = config.cell_model;
    let shape = world.shape(model)?;

    println!("Loading grid from {:?}...", grid_path);
    let grid = snapshot::load_or_else(grid_path, shape, model, || {
        if random {
            generate::random_for_model(shape, model, default_codes(&config), seed)
        } else {
            Grid::new(shape, model)
        }
    })?;

    let atlas = match atlas_path {
        Some(path) => Some(TextureAtlas::from_path(path)?),
        None => None,
    };

    let mesher = Mesher::with_config(config);
    let output = mesher.mesh(&grid);
    output.batches.validate(output.quad_count() as u32)?;

    println!(
        "  Generated {} vertices, {} quads in {} texture groups",
        output.vertex_count(),
        output.quad_count(),
        output.batches.len()
    );
    if let Some(bounds) = &output.bounds {
        println!("  Bounds size: {:?}", bounds.dimensions());
    }

    fs::create_dir_all(output_dir)?;
    export_output(&output, atlas.as_ref(), output_dir, name, format)?;

    Ok(())
}

fn export_output(
    output: &MesherOutput,
    atlas: Option<&TextureAtlas>,
    dir: &Path,
    name: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Raw => {
            let raw = export_raw(output);
            let (bin_path, json_path) = raw.write_to_dir(dir, name)?;
            println!("Exported raw buffer to {:?}", bin_path);
            println!("  Manifest: {:?}", json_path);
        }
        OutputFormat::Obj => {
            let obj_export = ObjExport::from_output(output, atlas, name)?;
            obj_export.write_to_dir(dir, name)?;
            println!("Exported OBJ to {:?}", dir.join(format!("{}.obj", name)));
            if obj_export.texture_png.is_some() {
                println!("  Texture: {:?}", dir.join(format!("{}_atlas.png", name)));
            }
        }
    }

    Ok(())
}

fn generate_snapshot(
    world: &WorldArgs,
    seed: u64,
    codes: Option<u16>,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = world.config()?;
    let model = config.cell_model;
    let shape = world.shape(model)?;
    let codes = codes.unwrap_or_else(|| default_codes(&config));

    let grid = generate::random_for_model(shape, model, codes, seed)?;
    snapshot::save_to_path(&grid, output)?;

    let occupied = grid.code_histogram(Channel::Base).values().sum::<usize>();
    println!(
        "Wrote {:?} grid of {:?} cells ({} occupied) to {:?}",
        model, shape.size, occupied, output
    );

    Ok(())
}

fn show_grid_info(grid_path: &Path, world: &WorldArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = world.config()?;
    let model = config.cell_model;
    let shape = world.shape(model)?;
    let grid = snapshot::load_from_path(grid_path, shape, model)?;

    println!("\nGrid Info:");
    println!("  Model: {:?}", model);
    println!("  Min corner: {:?}", shape.min);
    println!("  Size: {:?}", shape.size);

    let channels: &[(Channel, &str)] = match model {
        CellModel::Single => &[(Channel::Base, "Codes")],
        CellModel::TwoMaterial => &[(Channel::Base, "Base codes"), (Channel::Side, "Side codes")],
    };
    for (channel, label) in channels {
        let histogram = grid.code_histogram(*channel);
        let total: usize = histogram.values().sum();
        println!("  {}: {} cells, {} distinct", label, total, histogram.len());
        for (code, count) in &histogram {
            println!("    {:>5}: {}", code, count);
        }
    }

    Ok(())
}
