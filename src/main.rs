use anyhow::{Context, Result};
use log::{error, info};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use review_responder::{Config, Responder, ResponseMode};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let mode: ResponseMode = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => ResponseMode::Normal,
    };

    let cfg = Config::from_env().context("invalid configuration")?;
    let responder = Responder::from_config(&cfg).context("failed to start review responder")?;
    info!("review responder ready ({mode} mode)");

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        stdout
            .write_all(b"Enter a user review (or type 'exit'): ")
            .await?;
        stdout.flush().await?;
        let Some(review_text) = lines.next_line().await? else {
            break;
        };
        if review_text.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        stdout.write_all(b"Enter a rating (1-5, blank for none): ").await?;
        stdout.flush().await?;
        let Some(raw_rating) = lines.next_line().await? else {
            break;
        };
        let rating = match raw_rating.trim() {
            "" => None,
            r => match r.parse::<u8>() {
                Ok(r) => Some(r),
                Err(e) => {
                    error!("invalid rating `{r}`: {e}");
                    continue;
                }
            },
        };

        match responder.respond_to(&review_text, rating, Some(mode)).await {
            Ok(reply) => {
                stdout.write_all(format!("\n{reply}\n\n").as_bytes()).await?;
            }
            Err(e) => error!("{e}"),
        }
    }
    Ok(())
}
