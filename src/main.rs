use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use tvsubtitles::{CacheMode, Episode, InteractiveSelection, Show, TvSubtitles, TvSubtitlesError};

/// Browse the shows and subtitles listed on tvsubtitles.net
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Name of the show to look up, or its numeric site id
    show: String,

    /// Show the episodes of this season
    #[arg(short, long)]
    season: Option<u32>,

    /// Show the subtitle releases of this episode (requires --season)
    #[arg(short, long, requires = "season")]
    episode: Option<u32>,

    /// Only list releases in this language
    #[arg(short, long)]
    language: Option<String>,

    /// Pick the show from a menu when the name matches several
    #[arg(short, long)]
    interactive: bool,

    /// Fetch every page from the site
    #[arg(long, conflicts_with = "cache_dir")]
    no_cache: bool,

    /// Cache pages in this directory instead of the platform cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Print debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), TvSubtitlesError> {
    let cache = match (&args.cache_dir, args.no_cache) {
        (_, true) => CacheMode::Disabled,
        (Some(dir), false) => CacheMode::Directory(dir.clone()),
        (None, false) => CacheMode::Default,
    };

    let mut builder = TvSubtitles::builder().cache(cache);
    if let Some(language) = &args.language {
        builder = builder.language(language.clone());
    }
    if args.interactive {
        builder = builder.selection(InteractiveSelection::with_limit(20));
    }
    let mut client = builder.build()?;

    let show = match args.show.trim().parse::<u32>() {
        Ok(id) => client.show(id)?,
        Err(_) => client.show(args.show.as_str())?,
    };

    match (args.season, args.episode) {
        (Some(season), Some(episode)) => {
            let episode = show.season(season)?.episode(episode)?;
            print_releases(episode, client.language())?;
        }
        (Some(season), None) => {
            let season = show.season(season)?;
            println!("{}", season);
            for episode in season.iter() {
                println!("  {}", episode);
            }
        }
        _ => print_show(&show),
    }

    Ok(())
}

fn print_show(show: &Show) {
    println!("{}", show);
    for season in show {
        println!("  {}", season);
    }
}

fn print_releases(episode: &Episode, language: Option<&str>) -> Result<(), TvSubtitlesError> {
    println!("{}", episode);

    let releases = episode.languages()?;
    let languages = match language {
        Some(language) => vec![language],
        None => releases.languages()?,
    };

    if languages.is_empty() {
        println!("  No subtitles found.");
        return Ok(());
    }

    for language in languages {
        println!("\n=== {} ===", language);
        for release in releases.get(language)? {
            let uploaded = release
                .uploaded
                .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!("  {}", release.name);
            println!(
                "    {} / {} by {} on {}",
                release.rip, release.release, release.author, uploaded
            );
            println!(
                "    +{} -{}, {} downloads",
                release.good, release.bad, release.downloaded
            );
            println!("    {}", release.download_url);
        }
    }

    Ok(())
}
