use flat_shading_lib::{
    application::{self, ApplicationError},
    config::Config,
    scene::Scene,
};

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Scene(#[from] flat_shading_lib::scene::SceneError),
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::default();
    let scene = Scene::preset()?;
    tracing::info!(
        width = config.canvas_width,
        height = config.canvas_height,
        spheres = scene.len(),
        "starting"
    );

    pollster::block_on(application::run(config, scene))?;
    Ok(())
}
