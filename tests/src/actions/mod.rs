use crate::data;
use debileweb_common::api::Client;

pub async fn import_sample_farm(client: &Client) {
    client.import(&data::sample_farm()).await.unwrap();
}

pub async fn import_farm_with_sources(client: &Client, count: usize) {
    client
        .import(&data::farm_with_sources(count))
        .await
        .unwrap();
}
