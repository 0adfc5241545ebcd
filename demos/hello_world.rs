use std::sync::Arc;

use es_cookie::cookies::{encode, CookieAttributes, CookieJar, CookieStore, InMemoryCookieStore, SameSite};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // The store plays the role of the browser's cookie jar for a single page.
    let store = Arc::new(InMemoryCookieStore::new("https://localhost/app/index.html".parse()?));
    let jar = CookieJar::new(store.clone());

    let attrs = CookieAttributes::builder()
        .expires_in_days(7.0)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()?;

    println!("encoded: {}", encode("session", "abc;123", &attrs));

    jar.set("session", "abc;123", &attrs)?;
    jar.set("theme", "dark", &CookieAttributes::default())?;
    println!("document.cookie: {}", store.read());

    for (name, value) in jar.get_all() {
        println!("  {name} = {value}");
    }

    jar.remove("session", &CookieAttributes::default())?;
    println!("after remove: {}", store.read());

    Ok(())
}
