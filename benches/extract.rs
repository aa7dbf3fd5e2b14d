// benches/extract.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use eo_scrape::config::VerifyOptions;
use eo_scrape::specs::article::ArticleParser;
use eo_scrape::specs::listing::ListingParser;
use eo_scrape::core::net::Page;
use url::Url;

fn sample_article() -> String {
    let mut body = String::new();
    for i in 1..=40 {
        body.push_str(&format!(
            "<h2>Sec. {i}.</h2><p>By the authority vested in me as President by the Constitution and \
             the laws of the United States of America, section {i} provides as follows.</p>\
             <ul><li>(a) first clause</li><li>(b) second clause</li></ul>"
        ));
    }
    format!(
        "<html><head><title>Sample Order</title>\
         <meta property=\"article:published_time\" content=\"2025-01-20T17:00:00+00:00\"></head>\
         <body><nav><p>Menu</p></nav><main><h1>Sample Order</h1>\
         <div class=\"taxonomy-category\"><a href=\"/presidential-actions/executive-orders/\">Executive Orders</a></div>\
         <div class=\"entry-content\">{body}<script>var x = 1;</script></div></main>\
         <footer><p>Footer</p></footer></body></html>"
    )
}

fn sample_listing() -> String {
    let mut html = String::from("<html><body><ul>");
    for i in 0..10 {
        html.push_str(&format!(
            "<li class=\"wp-block-post\"><h2 class=\"wp-block-post-title\">\
             <a href=\"/presidential-actions/2025/01/order-{i}/\">Order {i}</a></h2>\
             <div class=\"wp-block-post-date\"><time datetime=\"2025-01-2{i}T12:00:00-05:00\">January 2{i}, 2025</time></div></li>"
        ));
    }
    html.push_str("</ul><a class=\"wp-block-query-pagination-next\" href=\"page/2/\">Next</a></body></html>");
    html
}

fn bench_extract(c: &mut Criterion) {
    let article = sample_article();
    let parser = ArticleParser::new().expect("selectors");
    let verify = VerifyOptions::default();

    c.bench_function("article_parse", |b| {
        b.iter(|| {
            let a = parser.parse(black_box(&article));
            black_box(a.body.len())
        })
    });

    c.bench_function("article_parse_verify", |b| {
        b.iter(|| {
            let a = parser.parse(black_box(&article));
            black_box(a.verify(&verify))
        })
    });

    let page = Page {
        url: Url::parse("https://www.whitehouse.gov/presidential-actions/").expect("url"),
        body: sample_listing(),
    };
    let listing = ListingParser::new().expect("selectors");
    c.bench_function("listing_parse", |b| {
        b.iter(|| {
            let p = listing.parse(black_box(&page)).expect("entries");
            black_box(p.candidates.len())
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
