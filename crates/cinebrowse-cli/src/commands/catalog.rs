use super::Context;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;

pub async fn run_seasons(ctx: &Context, series_id: i64, output: &Output) -> Result<()> {
    let seasons = ctx
        .client
        .seasons(series_id)
        .await
        .map_err(|e| eyre!("Could not load seasons of series {}: {}", series_id, e))?;

    if seasons.is_empty() {
        output.info(format!("Series {} has no seasons", series_id));
        return Ok(());
    }
    output.seasons(&seasons);
    Ok(())
}

pub async fn run_genres(ctx: &Context, output: &Output) -> Result<()> {
    let genres = ctx
        .client
        .genres()
        .await
        .map_err(|e| eyre!("Could not load genres: {}", e))?;
    output.genres(&genres);
    Ok(())
}

pub async fn run_countries(ctx: &Context, output: &Output) -> Result<()> {
    let countries = ctx
        .client
        .countries()
        .await
        .map_err(|e| eyre!("Could not load countries: {}", e))?;
    output.countries(&countries);
    Ok(())
}
