//! Plays the core [`DemoPlayer`] against the live page with real timers.

use gloo_timers::future::sleep;
use hashmark_core::{BlockConverter, DemoLine, DemoPlayer, DemoTick, EditorConfig, HostError};

use crate::cursor::blink_for;
use crate::dom::BrowserDocument;

/// Type out every demo line, pausing on headings, until the script runs out.
pub async fn play_demo(
    host: &BrowserDocument,
    converter: BlockConverter,
    config: &EditorConfig,
) -> Result<(), HostError> {
    let mut host = host.clone();
    let lines = DemoLine::collect(&host, config);
    tracing::info!(target: "hashmark::demo", lines = lines.len(), "starting demo");

    let mut player = DemoPlayer::new(lines, converter, config);
    loop {
        match player.advance(&mut host)? {
            DemoTick::Wait(duration) => sleep(duration).await,
            DemoTick::Pause { duration, anchor } => {
                blink_for(&host, Some(anchor), duration, config).await?;
            }
            DemoTick::Done => break,
        }
    }
    Ok(())
}
