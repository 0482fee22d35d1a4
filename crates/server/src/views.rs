//! HTML chrome around a rendered page.

use dispatcher::{
    AppFailure, AppHeader, CatalogView, NavigationPanel, PageBody, RenderedPage,
};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use module_loader::{Block, Metric, Page, Table};
use shared::{
    domain::ActivationKind,
    protocol::{CatalogEntrySummary, Notice, NoticeLevel, ViewPosition},
};

const STYLE: &str = r#"
* { box-sizing: border-box; }
body {
    margin: 0;
    font-family: 'Inter', system-ui, sans-serif;
    background: #f5f7fa;
    color: #1f2933;
    display: flex;
    min-height: 100vh;
}
form { margin: 0; }
.sidebar {
    width: 15rem;
    background: #1f2933;
    color: #e4e7eb;
    padding: 1.5rem 1rem;
    display: flex;
    flex-direction: column;
    gap: 0.4rem;
}
.sidebar h2 { font-size: 0.8rem; text-transform: uppercase; letter-spacing: 1px; opacity: 0.7; }
.sidebar button {
    width: 100%;
    text-align: left;
    background: transparent;
    color: inherit;
    border: 0;
    border-radius: 6px;
    padding: 0.45rem 0.6rem;
    cursor: pointer;
    font-size: 0.95rem;
}
.sidebar button:hover, .sidebar button.active { background: #2e86ab; color: #fff; }
main { flex: 1; padding: 2rem 2.5rem; max-width: 80rem; }
.masthead h1 { margin: 0 0 1.5rem 0; font-size: 2rem; }
.category { margin: 2rem 0 0.75rem 0; border-bottom: 2px solid #2e86ab; padding-bottom: 0.3rem; }
.card-row { display: grid; gap: 1rem; margin-bottom: 1rem; }
.card button {
    width: 100%;
    height: 100%;
    text-align: left;
    background: #fff;
    border: 1px solid #d9e2ec;
    border-radius: 12px;
    padding: 1.1rem 1.25rem;
    cursor: pointer;
    box-shadow: 0 2px 8px rgba(31, 41, 51, 0.06);
}
.card button:hover { border-color: #2e86ab; }
.card .icon { font-size: 1.6rem; }
.card .name { display: block; font-weight: 600; font-size: 1.05rem; margin: 0.3rem 0; }
.card .description { color: #52606d; font-size: 0.9rem; }
.card .badge { display: inline-block; margin-top: 0.5rem; font-size: 0.75rem; color: #a23b72; }
.app-header {
    background: linear-gradient(135deg, #2e86ab 0%, #a23b72 100%);
    color: #fff;
    border-radius: 15px;
    padding: 1rem 1.5rem;
    margin-bottom: 1.5rem;
    text-align: center;
}
.app-header .icon { font-size: 1.8rem; }
.app-header h1 { margin: 0.3rem 0; font-size: 1.8rem; letter-spacing: 1px; text-transform: uppercase; }
.app-header p { margin: 0.3rem 0; opacity: 0.95; }
.back button, .clear-filter button {
    background: #fff;
    border: 1px solid #2e86ab;
    color: #2e86ab;
    border-radius: 6px;
    padding: 0.4rem 0.8rem;
    cursor: pointer;
    margin-bottom: 1rem;
}
.notice { border-radius: 8px; padding: 0.75rem 1rem; margin: 0.5rem 0; }
.notice.info { background: #e6f6ff; color: #035388; }
.notice.warning { background: #fffbea; color: #8d2b0b; }
.notice.error { background: #ffe3e3; color: #8a041a; }
.metrics { display: flex; gap: 1rem; flex-wrap: wrap; margin: 1rem 0; }
.metric { background: #fff; border: 1px solid #d9e2ec; border-radius: 10px; padding: 0.8rem 1rem; min-width: 10rem; }
.metric .label { font-size: 0.8rem; color: #52606d; }
.metric .value { font-size: 1.5rem; font-weight: 600; }
.metric .delta { font-size: 0.8rem; color: #2e86ab; }
table { border-collapse: collapse; width: 100%; background: #fff; margin: 1rem 0; }
th, td { border-bottom: 1px solid #d9e2ec; padding: 0.5rem 0.75rem; text-align: left; }
th { background: #f0f4f8; }
"#;

pub(crate) fn page(rendered: &RenderedPage) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (rendered.title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                @if let Some(navigation) = &rendered.navigation {
                    (sidebar(navigation))
                }
                main {
                    @for notice in &rendered.notices {
                        (notice_box(notice))
                    }
                    @match &rendered.body {
                        PageBody::About { title, paragraphs } => {
                            div.masthead { h1 { (title) } }
                            @for paragraph in paragraphs {
                                p { (paragraph) }
                            }
                        }
                        PageBody::App { header, page } => {
                            (app_header(header))
                            (page_blocks(page))
                        }
                        PageBody::AppFailed { header, failure } => {
                            (back_to_catalog())
                            (app_failure(header, failure))
                        }
                        PageBody::Catalog(view) => {
                            div.masthead { h1 { "📊 " (rendered.title) } }
                            (catalog(view))
                        }
                    }
                }
            }
        }
    }
}

fn sidebar(navigation: &NavigationPanel) -> Markup {
    let home_active =
        navigation.position == ViewPosition::Home && navigation.active_category.is_none();
    html! {
        nav.sidebar {
            h2 { "Navigation" }
            form method="post" action="/home" {
                button.active[home_active] type="submit" { "🏠 Home" }
            }
            h2 { "Categories" }
            @for category in &navigation.categories {
                @let active = navigation.active_category.as_deref() == Some(category.as_str());
                form method="post" action="/categories/select" {
                    input type="hidden" name="category" value=(category);
                    button.active[active] type="submit" { (category) }
                }
            }
            h2 { "Help" }
            form method="post" action="/about" {
                button.active[navigation.position == ViewPosition::About] type="submit" { "ℹ️ About" }
            }
        }
    }
}

fn catalog(view: &CatalogView) -> Markup {
    let columns = format!("grid-template-columns: repeat({}, 1fr);", view.cards_per_row);
    html! {
        @if view.show_clear_filter {
            form.clear-filter method="post" action="/categories/clear" {
                button type="submit" { "🔙 Show All Categories" }
            }
        }
        @for section in &view.sections {
            h2.category { (section.category) }
            @for row in &section.rows {
                div.card-row style=(columns) {
                    @for card in row {
                        (catalog_card(card))
                    }
                }
            }
        }
    }
}

fn catalog_card(card: &CatalogEntrySummary) -> Markup {
    let external = card.kind == ActivationKind::External;
    // Without a url the selection only yields a notice, which belongs in this tab.
    let target = card.url.as_ref().map(|_| "_blank");
    html! {
        form.card method="post" action="/apps/select" target=[target] {
            input type="hidden" name="app_id" value=(card.app_id.as_str());
            button type="submit" {
                span.icon { (card.icon) }
                span.name { (card.name) }
                span.description { (card.description) }
                @if external {
                    span.badge { "↗ Opens externally" }
                }
            }
        }
    }
}

fn back_to_catalog() -> Markup {
    html! {
        form.back method="post" action="/home" {
            button type="submit" { "← Back to catalog" }
        }
    }
}

fn app_header(header: &AppHeader) -> Markup {
    html! {
        (back_to_catalog())
        header.app-header data-app=(header.app_id.as_str()) {
            div.icon { (header.icon) }
            h1 { (header.name) }
            p { (header.description) }
        }
    }
}

fn app_failure(header: &AppHeader, failure: &AppFailure) -> Markup {
    html! {
        (notice_box(&Notice::error(failure.headline(&header.name))))
        (notice_box(&Notice::info(failure.hint())))
    }
}

fn notice_box(notice: &Notice) -> Markup {
    let level = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    html! {
        div class=(format!("notice {level}")) role="alert" { (notice.message) }
    }
}

fn page_blocks(page: &Page) -> Markup {
    html! {
        @for block in page.blocks() {
            @match block {
                Block::Heading { level: 2, text } => { h2 { (text) } }
                Block::Heading { level: 3, text } => { h3 { (text) } }
                Block::Heading { text, .. } => { h4 { (text) } }
                Block::Text(text) => { p { (text) } }
                Block::Metrics(metrics) => { (metric_strip(metrics)) }
                Block::Table(table) => { (data_table(table)) }
                Block::Notice(notice) => { (notice_box(notice)) }
            }
        }
    }
}

fn metric_strip(metrics: &[Metric]) -> Markup {
    html! {
        div.metrics {
            @for metric in metrics {
                div.metric {
                    div.label { (metric.label) }
                    div.value { (metric.value) }
                    @if let Some(delta) = &metric.delta {
                        div.delta { (delta) }
                    }
                }
            }
        }
    }
}

fn data_table(table: &Table) -> Markup {
    html! {
        table {
            thead {
                tr {
                    @for header in &table.headers {
                        th { (header) }
                    }
                }
            }
            tbody {
                @for row in &table.rows {
                    tr {
                        @for cell in row {
                            td { (cell) }
                        }
                    }
                }
            }
        }
    }
}
