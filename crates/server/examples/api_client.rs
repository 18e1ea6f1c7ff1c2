//! Walkthrough of the Coffee Journey API against a running server

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

const SERVER_URL: &str = "http://localhost:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = Client::new();

    // Example 1: Health check
    println!("1. Health Check:");
    let resp = client.get(format!("{SERVER_URL}/health")).send().await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 2: Create a coffee with an image
    println!("2. Create Coffee:");
    let image = Part::bytes(b"\x89PNG\r\n\x1a\nnot really a png".to_vec())
        .file_name("kenya.png")
        .mime_str("image/png")?;
    let form = Form::new()
        .text("name", "Kenya AA")
        .text("company", "Square Mile")
        .text("tags", "blackcurrant, bright")
        .text("price", "12.34")
        .part("image", image);
    let resp = client
        .post(format!("{SERVER_URL}/coffeeJourney/"))
        .multipart(form)
        .send()
        .await?;
    println!("Status: {}", resp.status());
    let created: Value = resp.json().await?;
    println!("Body: {created}");
    println!();

    let Some(id) = created["id"].as_str().map(str::to_owned) else {
        anyhow::bail!("create did not return an id");
    };

    // Example 3: List coffees
    println!("3. List Coffees:");
    let resp = client
        .get(format!("{SERVER_URL}/coffeeJourney/"))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 4: Update without a price keeps the stored one
    println!("4. Update Coffee:");
    let resp = client
        .put(format!("{SERVER_URL}/coffeeJourney/{id}"))
        .form(&[
            ("name", "Kenya AA Peaberry"),
            ("company", "Square Mile"),
            ("tags", "blackcurrant, juicy"),
        ])
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 5: Fetch one coffee
    println!("5. Get Coffee:");
    let resp = client
        .get(format!("{SERVER_URL}/coffeeJourney/{id}"))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 6: Fetch the image
    println!("6. Get Image:");
    let resp = client
        .get(format!("{SERVER_URL}/coffeeJourney/images/{id}"))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!(
        "Content-Type: {:?}",
        resp.headers().get(reqwest::header::CONTENT_TYPE)
    );
    println!("Bytes: {}", resp.bytes().await?.len());
    println!();

    // Example 7: Invalid price
    println!("7. Invalid Price:");
    let resp = client
        .post(format!("{SERVER_URL}/coffeeJourney/"))
        .form(&[
            ("name", "Bad"),
            ("company", "Input"),
            ("tags", ""),
            ("price", "12.345"),
        ])
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 8: Delete
    println!("8. Delete Coffee:");
    let resp = client
        .delete(format!("{SERVER_URL}/coffeeJourney/{id}"))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);

    Ok(())
}
