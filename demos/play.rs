use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use notify::{RecursiveMode, Watcher};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use presets::prelude::*;

// -------------------------------------------------------------------------------------------------

const DEMO_PATH: &str = "./demos/data";
const SEQUENCE_FILE_NAME: &str = "sequence.txt";
const DEFAULT_SEQUENCE: &str = "1, 2, 3-1, ?, 2*";

const FRAME_DURATION: Duration = Duration::from_millis(16);

// -------------------------------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // init logging
    TermLogger::init(
        log::LevelFilter::Info,
        ConfigBuilder::default().build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .unwrap_or_else(|err| {
        log::error!("init_logger error: {err:?}");
    });

    // create engine and parameters
    let (event_sender, event_receiver) = crossbeam_channel::unbounded();
    let mut engine = PresetEngine::new(
        EngineConfig::default()
            .with_folder_path(DEMO_PATH)
            .with_preset_duration(4.0)
            .with_interpolation_duration(2.0),
        event_sender,
    );
    engine.setup(vec![
        Box::new(
            ParameterMap::new("circle")
                .with_bounds("count", 12, 1.0, 64.0)
                .with_bounds("radius", 40.0_f32, 5.0, 200.0)
                .with("filled", true)
                .with("fill", Color::rgb(200, 40, 40)),
        ),
        Box::new(ParameterMap::new("background").with("color", Color::rgb(16, 16, 16))),
    ]);
    engine.set_folder_path(DEMO_PATH);

    // seed a few presets, unless they already exist
    seed_presets(&mut engine)?;

    // load the initial sequence
    let sequence_path = PathBuf::from(DEMO_PATH).join(SEQUENCE_FILE_NAME);
    if !sequence_path.exists() {
        fs::write(&sequence_path, DEFAULT_SEQUENCE)?;
    }
    load_sequence(&mut engine, &sequence_path);
    engine.play_sequence();

    // Watch for sequence file changes, signaling in 'sequence_changed'
    let sequence_changed = Arc::new(AtomicBool::new(false));

    let mut watcher = notify::recommended_watcher({
        let sequence_changed = sequence_changed.clone();
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !event.kind.is_access() {
                    log::info!("File change event: {event:?}");
                    sequence_changed.store(true, Ordering::Relaxed);
                }
            }
            Err(err) => log::error!("File watch error: {err}"),
        }
    })?;
    watcher.watch(Path::new(DEMO_PATH), RecursiveMode::NonRecursive)?;

    // stop on Control-C
    let stop_running = Arc::new(AtomicBool::new(false));
    ctrlc::set_handler({
        let stop_running = stop_running.clone();
        move || {
            stop_running.store(true, Ordering::Relaxed);
        }
    })?;

    // run the engine at ~60 fps
    while !stop_running.load(Ordering::Relaxed) {
        if sequence_changed.swap(false, Ordering::Relaxed) {
            log::info!("Reloading sequence...");
            load_sequence(&mut engine, &sequence_path);
        }
        engine.update();
        for event in event_receiver.try_iter() {
            log::info!("Event: {event}");
            if event == PresetEvent::TransitionFinished {
                dump_parameters(&engine);
            }
        }
        std::thread::sleep(FRAME_DURATION);
    }

    engine.stop();
    Ok(())
}

// -------------------------------------------------------------------------------------------------

fn seed_presets(engine: &mut PresetEngine) -> anyhow::Result<()> {
    let presets: [(PresetId, i32, f32, Color); 3] = [
        (1, 6, 20.0, Color::rgb(230, 60, 40)),
        (2, 24, 80.0, Color::rgb(40, 200, 120)),
        (3, 48, 160.0, Color::rgba(60, 80, 240, 160)),
    ];
    for (id, count, radius, fill) in presets {
        if engine.preset_exists(id) {
            continue;
        }
        let group = engine
            .group_mut("circle")
            .ok_or_else(|| anyhow::anyhow!("Missing 'circle' parameter group"))?;
        group.set_value("count", count.into())?;
        group.set_value("radius", radius.into())?;
        group.set_value("fill", fill.into())?;
        if !engine.save_preset(id) {
            anyhow::bail!("Failed to save preset {id}");
        }
    }
    Ok(())
}

fn load_sequence(engine: &mut PresetEngine, path: &Path) {
    match fs::read_to_string(path) {
        Ok(text) => {
            if let Err(err) = engine.load_sequence(&text) {
                log::warn!("Sequence '{}' failed to parse:\n{}", path.display(), err);
            }
        }
        Err(err) => log::warn!("Failed to read sequence '{}': {}", path.display(), err),
    }
}

fn dump_parameters(engine: &PresetEngine) {
    for group in engine.groups() {
        for key in group.keys() {
            if let Some(value) = group.value(&key) {
                log::info!("  {}.{} = {}", group.name(), key, value);
            }
        }
    }
}
