use std::io::{self, Write};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use parley::banner::{BannerInfo, print_banner};
use parley::client::Page;
use parley::client::http::RelayClient;
use parley::consts::{API_KEY_ENV, DEFAULT_API_BASE, DEFAULT_MODEL, DEFAULT_PORT};
use parley::relay::{self, AppState, RelayConfig};
use parley::speech::command::CommandSpeech;
use parley::speech::{Muted, Speech};
use parley::spinner::Spinner;
use parley::upstream::gemini::{GeminiConfig, GeminiUpstream};

#[derive(Parser)]
#[command(name = "parley", version, about = "A voice, lent to a question.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

/// Relay settings. Used when no subcommand is given.
#[derive(Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Gemini model name
    #[arg(short, long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Generative Language API base URL
    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a running relay from the terminal
    Ask(AskArgs),
}

#[derive(Args)]
struct AskArgs {
    /// Relay base URL
    #[arg(short, long, env = "PARLEY_SERVER", default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Ask a single question and exit (non-interactive)
    #[arg(short, long)]
    run: Option<String>,

    /// Text-to-speech command; the answer is appended as its last argument
    /// (e.g. "espeak-ng -v en-us"). Answers are not spoken without it.
    #[arg(long, env = "PARLEY_TTS")]
    tts: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Ask(args)) => run_ask(args).await,
        None => run_serve(cli.serve).await,
    }
}

async fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    // Absence is not fatal: upstream will refuse and the relay reports it
    let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
    let key_status = if api_key.is_some() {
        format!("{API_KEY_ENV} ✓")
    } else {
        log::warn!("{API_KEY_ENV} is not set; every question will fail upstream");
        "not set".to_string()
    };

    let config = RelayConfig {
        host: args.host,
        port: args.port,
    };
    let gemini = GeminiUpstream::new(GeminiConfig {
        api_base: args.api_base.clone(),
        model: args.model,
        api_key,
    });

    print_banner(&BannerInfo {
        addr: &config.addr(),
        model: gemini.model(),
        api_base: &args.api_base,
        key_status: &key_status,
    });

    let app = relay::build_app(AppState::new(Arc::new(gemini)));
    relay::serve(app, &config).await
}

async fn run_ask(args: AskArgs) -> anyhow::Result<()> {
    let speech: Box<dyn Speech> = match args.tts.as_deref() {
        Some(command) => Box::new(CommandSpeech::new(command)?),
        None => Box::new(Muted),
    };
    let mut page = Page::new(Box::new(RelayClient::new(&args.server)), speech);

    // Single question mode
    if let Some(question) = args.run {
        page.set_question(question);
        ask(&mut page).await;
        return Ok(());
    }

    println!("parley → {}  (/mic to speak, /again to repeat, quit to leave)", args.server);

    // REPL: async stdin so Ctrl+C is caught at the prompt too
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\nparley> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "exit" => break,
            "/mic" => listen(&mut page).await,
            "/again" => page.speak_again().await,
            _ => {
                page.set_question(input);
                ask(&mut page).await;
            }
        }
    }

    println!("goodbye.");
    Ok(())
}

/// Ctrl+C during a request abandons it, not the REPL.
async fn ask(page: &mut Page) {
    let spinner = Spinner::start("thinking");
    let issued = tokio::select! {
        issued = page.submit() => Some(issued),
        _ = tokio::signal::ctrl_c() => None,
    };
    spinner.stop().await;

    match issued {
        Some(true) => println!("\n=> {}", page.state().answer),
        Some(false) => {}
        None => println!("\n\ninterrupted"),
    }
}

async fn listen(page: &mut Page) {
    let heard = tokio::select! {
        heard = page.listen() => Some(heard),
        _ = tokio::signal::ctrl_c() => None,
    };

    match heard {
        Some(Ok(())) => {
            println!("\n?  {}", page.state().question);
            println!("=> {}", page.state().answer);
        }
        Some(Err(notice)) => eprintln!("\n! {}", notice),
        None => println!("\n\ninterrupted"),
    }
}
