//! Example: delegated click handling on a parsed page

use anyhow::Result;
use fq::{EventMethods, Listener, query};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"
    <ul id="menu">
        <li><span class="label">Open</span></li>
        <li><span class="label">Save <b>now</b></span></li>
        <li><span class="label">Quit</span></li>
    </ul>
"#;

fn main() -> Result<()> {
    // RUST_LOG=fq=trace shows every climbing step
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let document = fq_html::parse(PAGE)?;
    let q = query(&document);
    println!("fq v{}", fq::VERSION);

    let items = q.select("#menu li")?;
    println!("{} menu items", items.len());

    let report = Listener::new(|document, this, event| {
        let tag = document
            .tree()
            .get(this)
            .and_then(|node| node.as_element())
            .map(|el| el.name.clone())
            .unwrap_or_default();
        println!("  {} reached <{tag}> {:?}", event.event_type(), this);
        Ok(())
    });

    let menu = q.select("#menu")?;
    menu.on("click", "li, .label", &report);

    let bold = q.select("b")?;
    if let Some(target) = bold.first() {
        println!("click on <b>:");
        q.trigger(target, "click")?;
    }

    menu.off("click", "li, .label", &report);
    println!("after off: {} delegated listeners", q.delegated_count());

    Ok(())
}
