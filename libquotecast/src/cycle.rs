//! Posting-cycle orchestration
//!
//! One cycle tops up the quote inventory, selects up to N unused quotes,
//! and for each one renders the image, generates a caption, publishes, and
//! marks the quote consumed. Everything runs strictly sequentially; there
//! is deliberately no overlap between external calls.

use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::caption::CaptionGenerator;
use crate::config::CycleConfig;
use crate::db::QuoteStore;
use crate::error::{RenderError, Result};
use crate::publish::Publisher;
use crate::render::QuoteRenderer;
use crate::supplier::QuoteSupplier;
use crate::types::{CycleReport, InventoryOutcome, PostedQuote};

#[derive(Debug, Clone)]
pub struct CycleOptions {
    /// How many quotes to publish per cycle; also the unused-inventory
    /// target during top-up.
    pub target_count: u32,
    /// Cap on supplier calls during top-up.
    pub max_fill_attempts: u32,
    /// Fixed pause between successive publishes, respecting platform
    /// posting-cadence norms.
    pub post_delay: Duration,
    /// Where the rendered image is written before upload.
    pub image_path: PathBuf,
}

impl CycleOptions {
    pub fn from_config(config: &CycleConfig) -> Self {
        Self {
            target_count: config.posts_per_cycle,
            max_fill_attempts: config.max_fill_attempts,
            post_delay: Duration::from_secs(config.post_delay_secs),
            image_path: PathBuf::from(shellexpand::tilde(&config.image_path).to_string()),
        }
    }
}

/// Orchestrates one posting cycle over explicitly injected collaborators.
pub struct CycleController {
    store: QuoteStore,
    supplier: Box<dyn QuoteSupplier>,
    renderer: Box<dyn QuoteRenderer>,
    captioner: Box<dyn CaptionGenerator>,
    publisher: Box<dyn Publisher>,
    options: CycleOptions,
}

impl CycleController {
    pub fn new(
        store: QuoteStore,
        supplier: Box<dyn QuoteSupplier>,
        renderer: Box<dyn QuoteRenderer>,
        captioner: Box<dyn CaptionGenerator>,
        publisher: Box<dyn Publisher>,
        options: CycleOptions,
    ) -> Self {
        Self {
            store,
            supplier,
            renderer,
            captioner,
            publisher,
            options,
        }
    }

    /// Run one full cycle.
    ///
    /// A publish (or render/caption) failure propagates and aborts the
    /// run with the current quote still unused, so it is retried on the
    /// next invocation. Finding nothing to post is a successful no-op.
    pub async fn run(&mut self) -> Result<CycleReport> {
        let inventory = self.ensure_inventory().await?;

        if let InventoryOutcome::Shortfall {
            available,
            target,
            attempts,
            ..
        } = &inventory
        {
            warn!(
                "Inventory could not be filled: {}/{} unused after {} attempts",
                available, target, attempts
            );
        }

        let selected = self.store.take_unused(self.options.target_count).await?;

        if selected.is_empty() {
            info!("No unused quotes available; nothing to publish");
            return Ok(CycleReport {
                inventory,
                posted: Vec::new(),
            });
        }

        self.publisher.authenticate().await?;

        let mut posted = Vec::new();

        for (i, quote) in selected.iter().enumerate() {
            if i > 0 {
                debug!(
                    "Waiting {}s before next publish",
                    self.options.post_delay.as_secs()
                );
                sleep(self.options.post_delay).await;
            }

            let image = self.renderer.render(&quote.text, &quote.author)?;
            std::fs::write(&self.options.image_path, &image.jpeg)
                .map_err(RenderError::IoError)?;

            let caption = self.captioner.generate(&quote.text).await?;

            let media_id = self
                .publisher
                .publish(&self.options.image_path, &caption)
                .await?;

            // Consumed only after the publish succeeded.
            self.store.mark_used(quote.id).await?;

            info!("Posted: {} - {}", quote.text, quote.author);
            posted.push(PostedQuote {
                quote_id: quote.id,
                text: quote.text.clone(),
                author: quote.author.clone(),
                caption,
                platform_post_id: media_id,
            });
        }

        Ok(CycleReport { inventory, posted })
    }

    /// Top up the unused-quote buffer to the target count.
    ///
    /// Supplier failures and duplicate quotes are non-fatal: they are
    /// logged, counted, and retried up to `max_fill_attempts` total
    /// supplier calls. Store failures are fatal.
    pub async fn ensure_inventory(&mut self) -> Result<InventoryOutcome> {
        let target = self.options.target_count;
        let mut available = self.store.count_unused().await?;
        let mut attempts = 0u32;
        let mut added = 0u32;
        let mut last_error = None;

        while available < target {
            if attempts >= self.options.max_fill_attempts {
                return Ok(InventoryOutcome::Shortfall {
                    available,
                    target,
                    attempts,
                    last_error,
                });
            }
            attempts += 1;

            match self.supplier.fetch_one().await {
                Ok(quote) => {
                    if self.store.insert_if_new(&quote.text, &quote.author).await? {
                        added += 1;
                        available += 1;
                        info!("Saved: {} - {}", quote.text, quote.author);
                    } else {
                        debug!("Already stored, ignoring: {}", quote.text);
                    }
                }
                Err(e) => {
                    warn!(
                        "Quote fetch from {} failed (attempt {}): {}",
                        self.supplier.name(),
                        attempts,
                        e
                    );
                    last_error = Some(e.to_string());
                }
            }
        }

        Ok(InventoryOutcome::Filled { added })
    }
}
