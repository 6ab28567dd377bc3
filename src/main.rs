use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use visual_tap::{
    AdbShell, DeviceDriver, ImageLocator, LocatorError, SearchRequest, TargetOffset,
    TemplateMatcher,
};

struct CliOptions {
    device: Option<String>,
    list_devices: bool,
    screenshot: Option<PathBuf>,
    image: Option<PathBuf>,
    timeout_secs: u64,
    similarity: Option<f32>,
    offset: Option<TargetOffset>,
    locate_only: bool,
    json_output: bool,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let mut opts = CliOptions {
        device: None,
        list_devices: false,
        screenshot: None,
        image: None,
        timeout_secs: 30,
        similarity: None,
        offset: None,
        locate_only: false,
        json_output: false,
    };
    let mut debug_mode = false;

    for arg in args.iter().skip(1) {
        if arg == "--help" || arg == "-h" {
            print_help();
            return ExitCode::SUCCESS;
        } else if arg == "--version" || arg == "-v" {
            println!(
                "visual-tap v{} (build {})",
                env!("CARGO_PKG_VERSION"),
                env!("APP_BUILD_YEAR")
            );
            return ExitCode::SUCCESS;
        } else if arg == "--debug" {
            debug_mode = true;
        } else if arg == "--locate-only" {
            opts.locate_only = true;
        } else if arg == "--json" {
            opts.json_output = true;
        } else if arg == "--devices" {
            opts.list_devices = true;
        } else if arg == "--screenshot" || arg == "-s" {
            opts.screenshot = Some(PathBuf::from("cli-screenshot.png"));
        } else if let Some(rest) = arg.strip_prefix("--screenshot=") {
            opts.screenshot = Some(PathBuf::from(rest));
        } else if let Some(rest) = arg.strip_prefix("--image=") {
            opts.image = Some(PathBuf::from(rest));
        } else if let Some(rest) = arg.strip_prefix("--device=") {
            opts.device = Some(rest.to_string());
        } else if let Some(rest) = arg.strip_prefix("--timeout=") {
            match rest.parse::<u64>() {
                Ok(secs) => opts.timeout_secs = secs,
                Err(_) => {
                    eprintln!("❌ Invalid timeout value: {rest}");
                    return ExitCode::FAILURE;
                }
            }
        } else if let Some(rest) = arg.strip_prefix("--similarity=") {
            match rest.parse::<f32>() {
                Ok(v) if (0.0..=1.0).contains(&v) => opts.similarity = Some(v),
                _ => {
                    eprintln!("❌ Invalid similarity value (expected 0.0-1.0): {rest}");
                    return ExitCode::FAILURE;
                }
            }
        } else if let Some(rest) = arg.strip_prefix("--offset=") {
            match parse_offset(rest) {
                Some(o) => opts.offset = Some(o),
                None => {
                    eprintln!("❌ Invalid offset (expected DX,DY): {rest}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            eprintln!("❌ Unknown argument: {arg}");
            print_help();
            return ExitCode::FAILURE;
        }
    }

    env_logger::Builder::from_default_env()
        .filter_level(if debug_mode {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    let rt = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");
    rt.block_on(run(opts))
}

async fn run(opts: CliOptions) -> ExitCode {
    if opts.list_devices {
        return match AdbShell::list_devices().await {
            Ok(devices) if devices.is_empty() => {
                println!("❌ No devices found");
                ExitCode::FAILURE
            }
            Ok(devices) => {
                if opts.json_output {
                    println!(
                        "{}",
                        serde_json::to_string(&devices).expect("serialize devices")
                    );
                } else {
                    for device in &devices {
                        match &device.transport_id {
                            Some(tid) => println!("📱 {} (transport_id:{tid})", device.name),
                            None => println!("📱 {}", device.name),
                        }
                    }
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ {e}");
                ExitCode::FAILURE
            }
        };
    }

    let driver = match connect(opts.device.as_deref()).await {
        Ok(d) => d,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };
    let (width, height) = driver.screen_dimensions();
    println!(
        "📱 Device: {} size: {}x{}",
        driver.device_name(),
        width,
        height
    );

    if let Some(path) = &opts.screenshot {
        return match driver.screen_capture().await {
            Ok(cap) => {
                if let Err(e) = tokio::fs::write(path, &cap.bytes).await {
                    eprintln!("❌ Write failed: {e}");
                    ExitCode::FAILURE
                } else {
                    println!(
                        "✅ Screenshot ({}ms) saved to {}",
                        cap.duration_ms,
                        path.display()
                    );
                    ExitCode::SUCCESS
                }
            }
            Err(e) => {
                eprintln!("❌ Screenshot failed: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let Some(image) = opts.image else {
        eprintln!("❌ --image=PATH is required");
        print_help();
        return ExitCode::FAILURE;
    };

    let mut request = SearchRequest::new(image, Duration::from_secs(opts.timeout_secs));
    if let Some(s) = opts.similarity {
        request = request.min_similarity(s);
    }
    if let Some(o) = opts.offset {
        request = request.target_offset(o);
    }

    let mut locator = ImageLocator::new(&driver, TemplateMatcher::new());

    let outcome = if opts.locate_only {
        locator.locate(&request).await
    } else {
        match locator.click(&request).await {
            Ok(point) => Ok(Some(point)),
            Err(e @ LocatorError::ElementNotVisible { .. }) => {
                eprintln!("❌ {e}");
                return ExitCode::FAILURE;
            }
            Err(e) => Err(e),
        }
    };

    match outcome {
        Ok(Some(point)) => {
            if opts.json_output {
                println!(
                    "{}",
                    serde_json::to_string(&point).expect("serialize tap point")
                );
            } else if opts.locate_only {
                println!("✅ Located at [{},{}]", point.x, point.y);
            } else {
                println!("✅ Tapped at [{},{}]", point.x, point.y);
            }
            ExitCode::SUCCESS
        }
        Ok(None) => {
            if opts.json_output {
                println!("null");
            } else {
                println!("👀 Not found");
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn connect(device: Option<&str>) -> visual_tap::DriverResult<AdbShell> {
    match device {
        Some(name) => AdbShell::new_with_device(name).await,
        None => AdbShell::new(None).await,
    }
}

fn parse_offset(raw: &str) -> Option<TargetOffset> {
    let (dx, dy) = raw.split_once(',')?;
    Some(TargetOffset::new(
        dx.trim().parse().ok()?,
        dy.trim().parse().ok()?,
    ))
}

fn print_help() {
    println!("🎯 Visual Tap - image-based element locator for Android devices");
    println!();
    println!("USAGE:");
    println!("    visual-tap --image=PATH [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --image=PATH        Reference image to find on screen (PNG/JPEG)");
    println!("    --timeout=N         Seconds to wait per attempt before scrolling (default: 30)");
    println!("    --device=NAME       Device serial or host:port (default: first attached)");
    println!("    --similarity=0.x    Minimum similarity score 0.0-1.0 (default: 0.7)");
    println!("    --offset=DX,DY      Tap offset from the matched pattern's center");
    println!("    --locate-only       Print the location without tapping");
    println!("    --json              Print the result as JSON");
    println!("    --devices           List attached devices and exit");
    println!("    --screenshot[=FILE] Save a screenshot and exit (default: cli-screenshot.png)");
    println!("    --debug             Enable debug output");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    visual-tap --image=login-button.png --timeout=10");
    println!("    visual-tap --image=menu.png --locate-only --json");
    println!("    visual-tap --image=icon.png --similarity=0.9 --offset=0,40");
    println!("    visual-tap --screenshot");
}
