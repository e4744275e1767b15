use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use strata_canvas::RecordingCanvas;
use strata_common::{Color, Rect};
use strata_scene::{Group, Node, Scene, SceneConfig, Shape};
use strata_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strata-cli", about = "CLI tool for strata scene operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Render the demo scene into a recording canvas and print every draw
    Render(SceneArgs),
    /// Print the demo scene's layer tree
    Tree(SceneArgs),
}

#[derive(Args)]
struct SceneArgs {
    /// JSON scene config (name, width, height)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Viewport width, overrides the config
    #[arg(long)]
    width: Option<f32>,
    /// Viewport height, overrides the config
    #[arg(long)]
    height: Option<f32>,
    /// Camera focus x in world units
    #[arg(long)]
    x: Option<f32>,
    /// Camera focus y in world units
    #[arg(long)]
    y: Option<f32>,
    /// Camera zoom factor
    #[arg(long, default_value = "1.0")]
    zoom: f32,
    /// Hide the UI layer
    #[arg(long)]
    hide_ui: bool,
}

impl SceneArgs {
    fn config(&self) -> anyhow::Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)
                .with_context(|| format!("loading scene config {}", path.display()))?,
            None => SceneConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        Ok(config)
    }

    fn build_scene(&self) -> anyhow::Result<Scene> {
        let config = self.config()?;
        let mut scene = Scene::from_config(&config)?;
        populate_demo(&mut scene);
        {
            let mut camera = scene.camera().borrow_mut();
            let focus = Vec2::new(
                self.x.unwrap_or(camera.position.x),
                self.y.unwrap_or(camera.position.y),
            );
            camera.set_position(focus);
            camera.set_zoom(self.zoom);
        }
        if self.hide_ui {
            scene.ui_mut().set_active(false);
        }
        Ok(scene)
    }
}

/// Background layer behind `world`, a few world-space sprites, and a HUD.
fn populate_demo(scene: &mut Scene) {
    let viewport = scene.viewport();

    let bg = scene.create_world_layer("background", Some(-100));
    bg.add_child(Shape::rect(
        "sky",
        Rect::new(-1000.0, -1000.0, 2000.0 + viewport.x, 1000.0 + viewport.y * 0.5),
        Color::rgb(0.4, 0.6, 0.9),
    ));

    let world = scene.world_mut();
    world.add_child(Shape::rect(
        "player",
        Rect::new(viewport.x * 0.5 - 8.0, viewport.y * 0.5 - 8.0, 16.0, 16.0),
        Color::rgb(0.2, 0.8, 0.3),
    ));
    let mut enemies = Group::new("enemies").with_draw_order(1);
    for i in 0..3 {
        enemies.add_child(Shape::circle(
            format!("enemy-{i}"),
            Vec2::new(100.0 + 150.0 * i as f32, 120.0),
            10.0,
            Color::rgb(0.9, 0.2, 0.2),
        ));
    }
    world.add_child(enemies);

    let ui = scene.ui_mut();
    ui.add_child(Shape::text("score", "SCORE 000", Vec2::new(12.0, 12.0), 18.0));
    ui.add_child(Shape::rect(
        "health",
        Rect::new(12.0, viewport.y - 24.0, 120.0, 12.0),
        Color::rgb(0.9, 0.1, 0.1),
    ));
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("strata-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("canvas: {}", strata_canvas::crate_info());
            println!("tools: {}", strata_tools::crate_info());
            let scene = Scene::new("Main", 800.0, 600.0);
            println!("default scene: {}", SceneInspector::summary(&scene));
        }
        Commands::Render(args) => {
            let scene = args.build_scene()?;
            let mut canvas = RecordingCanvas::new();
            scene.render(&mut canvas).context("render pass failed")?;
            tracing::info!(draws = canvas.records().len(), "render pass complete");

            print!("{}", canvas.dump());
            println!(
                "Transform stack: {}",
                if canvas.is_balanced() { "balanced" } else { "UNBALANCED" }
            );
            println!("Order: {}", SceneInspector::draw_sequence(&scene).join(" > "));
        }
        Commands::Tree(args) => {
            let scene = args.build_scene()?;
            print!("{}", SceneInspector::tree(&scene));
        }
    }

    Ok(())
}
