use super::{saved, Context};
use crate::output::Output;
use crate::ListArgs;
use catalog_core::{is_english_title, CountryPages, MoviePages, PageSource, PaginatedList, SeriesPages};
use catalog_models::{SortOrder, Title};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum Listing {
    Movies { genre: i64, order: SortOrder },
    Series { genre: i64, order: SortOrder },
    Country { id: i64 },
}

impl Listing {
    fn source(&self, ctx: &Context) -> Arc<dyn PageSource<Title>> {
        let client = ctx.client.clone();
        match *self {
            Listing::Movies { genre, order } => Arc::new(MoviePages::new(client, genre, order)),
            Listing::Series { genre, order } => Arc::new(SeriesPages::new(client, genre, order)),
            Listing::Country { id } => Arc::new(CountryPages::new(client, id)),
        }
    }

    fn label(&self) -> String {
        match self {
            Listing::Movies { genre, order } => format!("movies (genre {}, by {})", genre, order.as_path_segment()),
            Listing::Series { genre, order } => format!("series (genre {}, by {})", genre, order.as_path_segment()),
            Listing::Country { id } => format!("titles from country {}", id),
        }
    }
}

/// Load `args.pages` pages the way a scrolling screen would: one refresh,
/// then load-more until the page budget or the list runs out.
pub async fn run_browse(ctx: &Context, listing: Listing, args: ListArgs, output: &Output) -> Result<()> {
    let mut list = PaginatedList::new(listing.source(ctx));
    if ctx.config.browse.english_only && !args.all_languages {
        list = list.with_filter(is_english_title);
    }

    info!(listing = %listing.label(), pages = args.pages, "Browsing");
    list.refresh().await;

    let state = list.snapshot();
    if let Some(error) = state.error {
        // One retry, the way a user would hit the retry button once
        debug!(error = %error, "First page failed, retrying");
        list.retry().await;
        if let Some(error) = list.snapshot().error {
            return Err(eyre!("Could not load {}: {}", listing.label(), error));
        }
    }

    let mut loaded = 1;
    while loaded < args.pages && list.snapshot().can_load_more {
        list.load_more().await;
        let state = list.snapshot();
        if let Some(error) = state.error {
            output.warn(format!("Stopped at page {}: {}", state.current_page, error));
            break;
        }
        loaded += 1;
    }

    let state = list.snapshot();
    if state.items.is_empty() {
        output.info(format!("No {} found", listing.label()));
    } else {
        output.titles(&state.items);
    }
    if !state.can_load_more && output.is_human() {
        output.info("End of list reached");
    }

    if let Some(id) = args.save {
        saved::save_from(&state.items, id, output)?;
    }

    Ok(())
}
