use photofuse::{
    download_file_name, logger, EditSession, GeminiClient, GeminiConfig, ImageData, ImageFormat,
    PhotoStyle, SessionState,
};
use std::path::Path;
use std::process;

struct CliArgs {
    background: String,
    item: Option<String>,
    description: Option<String>,
    style: PhotoStyle,
    out: Option<String>,
}

impl CliArgs {
    fn build(args: Vec<String>) -> Result<Self, String> {
        let mut background = None;
        let mut item = None;
        let mut description = None;
        let mut style = PhotoStyle::default();
        let mut out = None;

        let mut iter = args.into_iter().skip(1);
        while let Some(arg) = iter.next() {
            if arg == "--item" {
                item = Some(iter.next().ok_or("--item requires a file path")?);
            } else if arg == "--desc" {
                description = Some(iter.next().ok_or("--desc requires a value")?);
            } else if arg == "--style" {
                let name = iter.next().ok_or("--style requires a value")?;
                style =
                    PhotoStyle::parse(&name).ok_or_else(|| format!("Unknown style: {}", name))?;
            } else if arg == "--out" {
                out = Some(iter.next().ok_or("--out requires a file path")?);
            } else if background.is_none() {
                background = Some(arg);
            } else {
                return Err(format!("Unexpected argument: {}", arg));
            }
        }

        Ok(Self {
            background: background
                .ok_or("Usage: photofuse <background> [--item <path>] [--desc <text>] [--style <name>] [--out <path>]")?,
            item,
            description,
            style,
            out,
        })
    }
}

/// Upload boundary: reads an image file and encodes it as a data URI.
/// The format is sniffed from magic bytes, falling back to the extension.
async fn load_image(path: &str) -> Result<String, String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path, e))?;

    let format = ImageFormat::from_magic_bytes(&bytes)
        .or_else(|| {
            Path::new(path)
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(ImageFormat::from_extension)
        })
        .ok_or_else(|| format!("{} is not a PNG, JPEG, or WEBP image", path))?;

    Ok(ImageData::from_bytes(format, &bytes).to_data_uri())
}

#[tokio::main]
async fn main() {
    if let Err(e) = logger::init_with_config(logger::LoggerConfig::development()) {
        eprintln!("{}", e);
        process::exit(1);
    }
    logger::log_startup_info("photofuse", env!("CARGO_PKG_VERSION"));

    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    let args = match CliArgs::build(std::env::args().collect()) {
        Ok(args) => args,
        Err(msg) => {
            log::error!("❌ {}", msg);
            process::exit(2);
        }
    };

    log::info!("🎨 Available styles:");
    for style in PhotoStyle::all() {
        log::info!("  {}", style);
    }

    // Missing credential is fatal at startup.
    let client = match GeminiClient::new(GeminiConfig::from_env()) {
        Ok(client) => {
            log::info!("✅ Gemini client initialized");
            client
        }
        Err(e) => {
            log::error!("❌ Failed to initialize Gemini client: {}", e);
            process::exit(1);
        }
    };

    let mut session = EditSession::new();
    session.set_style(args.style);

    match load_image(&args.background).await {
        Ok(uri) => session.set_background(uri),
        Err(msg) => {
            log::error!("❌ {}", msg);
            process::exit(2);
        }
    }

    if let Some(item_path) = &args.item {
        match load_image(item_path).await {
            Ok(uri) => session.set_item(uri),
            Err(msg) => {
                log::error!("❌ {}", msg);
                process::exit(2);
            }
        }
    }
    if let Some(description) = args.description {
        session.set_item_description(description);
    }

    log::info!("🖼️  Generating with style: {}", session.style());
    session.generate(client.edit()).await;

    match session.state() {
        SessionState::Succeeded(image) => {
            let filename = args.out.unwrap_or_else(download_file_name);
            match image.decode_bytes() {
                Ok(bytes) => match std::fs::write(&filename, bytes) {
                    Ok(_) => log::info!("💾 Image saved to: {}", filename),
                    Err(e) => {
                        log::error!("❌ Failed to save image: {}", e);
                        process::exit(1);
                    }
                },
                Err(e) => {
                    log::error!("❌ Failed to decode result image: {}", e);
                    process::exit(1);
                }
            }
        }
        SessionState::Failed(message) => {
            log::error!("❌ {}", message);
            process::exit(1);
        }
        _ => unreachable!("generation always resolves to success or failure"),
    }
}
