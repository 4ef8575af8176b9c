use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quill API",
        version = "0.1.0",
        description = "Scrapes quotes.toscrape.com into memory and serves search, tag filtering, statistics and CSV export."
    ),
    paths(
        crate::routes::scrape,
        crate::routes::list_quotes,
        crate::routes::get_stats,
        crate::routes::list_tags,
        crate::routes::export_quotes,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::ScrapeRequest,
        crate::dto::ScrapeResponse,
        crate::dto::QuoteResponse,
        crate::dto::QuoteListResponse,
        crate::dto::StatsResponse,
        crate::dto::TagListResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "scrape", description = "Run a collection and replace the record set"),
        (name = "quotes", description = "Query and export the current record set"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
