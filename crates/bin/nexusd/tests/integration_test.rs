//! End-to-end tests for the wired nexusd hub.
//!
//! Each test builds the complete hub from a TOML configuration (real
//! catalog, real resolver, real HTTP handler) and observes the requests it
//! makes against a mock HTTP server.

use std::time::Duration;

use mockito::{Mock, ServerGuard};
use nexusd::Hub;
use nexusd::config::Config;

fn config(toml: &str) -> Config {
    let config: Config = toml::from_str(toml).unwrap();
    config.validate().unwrap();
    config
}

async fn mock_get(server: &mut ServerGuard, path: &str, hits: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .expect(hits)
        .create_async()
        .await
}

/// Wait until `mock` has seen its expected requests; the processor runs on
/// its own task.
async fn wait_for(mock: &Mock) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !mock.matched_async().await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("request should arrive");
}

fn living_room(base: &str) -> String {
    format!(
        r#"
        [admission]
        offer_timeout_ms = 500

        [[handlers.http]]
        id = "http"

        [[devices]]
        id = "tv"
        activation = ["{base}/tv/on"]
        deactivation = ["{base}/tv/off"]

        [devices.mappings]
        vol-up = "{base}/tv/volume-up"

        [[activities]]
        id = "watch-tv"
        participants = ["tv"]

        [activities.mappings]
        volume-up = "device:tv:vol-up"

        [input-mappings]
        "test:remote:POWER:short-pressed" = "activity:switch:watch-tv"
        "test:remote:POWER:long-pressed" = "activity:off"
        "test:remote:VOLUMEUP:pressed" = "cmd:volume-up"
        "hci:remote:001f:41000000:short-pressed" = "cmd:volume-up"
        "#
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn should_drive_activity_lifecycle_from_input_events() {
    let mut server = mockito::Server::new_async().await;
    let on = mock_get(&mut server, "/tv/on", 1).await;
    let volume_up = mock_get(&mut server, "/tv/volume-up", 1).await;
    let off = mock_get(&mut server, "/tv/off", 1).await;
    let hub = Hub::start(config(&living_room(&server.url())));

    assert!(hub.queue().offer("test:remote:POWER:short-pressed".to_string()).await);
    wait_for(&on).await;

    assert!(hub.queue().offer("test:remote:VOLUMEUP:pressed".to_string()).await);
    wait_for(&volume_up).await;

    assert!(hub.queue().offer("test:remote:POWER:long-pressed".to_string()).await);
    wait_for(&off).await;

    on.assert_async().await;
    volume_up.assert_async().await;
    off.assert_async().await;
    hub.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn should_ignore_commands_without_activity_context() {
    let mut server = mockito::Server::new_async().await;
    let on = mock_get(&mut server, "/tv/on", 1).await;
    let volume_up = mock_get(&mut server, "/tv/volume-up", 0).await;
    let hub = Hub::start(config(&living_room(&server.url())));

    assert!(hub.queue().offer("test:remote:VOLUMEUP:pressed".to_string()).await);
    assert!(hub.queue().offer("test:remote:POWER:short-pressed".to_string()).await);

    // Events are processed in order: once the tv is on, `cmd:volume-up` has
    // already been dropped for lack of an activity.
    wait_for(&on).await;
    volume_up.assert_async().await;

    hub.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn should_keep_running_when_connectors_fail_to_start() {
    let mut server = mockito::Server::new_async().await;
    let on = mock_get(&mut server, "/tv/on", 1).await;
    let toml = format!(
        "{}\n[[connectors.input-device]]\nid = \"remote\"\ndevice = \"/nonexistent/event0\"\n",
        living_room(&server.url())
    );

    let hub = Hub::start(config(&toml));

    assert_eq!(hub.connectors(), 0);
    assert!(hub.queue().offer("test:remote:POWER:short-pressed".to_string()).await);
    wait_for(&on).await;
    hub.shutdown();
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn should_route_bluetooth_remote_press_through_activity() {
    let mut server = mockito::Server::new_async().await;
    let on = mock_get(&mut server, "/tv/on", 1).await;
    let volume_up = mock_get(&mut server, "/tv/volume-up", 1).await;
    let script = "sleep 0.5; \
                  printf '> 02 01 2E 0B 00 07 00 04 00 1B 1F 00 41 00 00 00\\n\
                  > 02 01 2E 0B 00 07 00 04 00 1B 1F 00 00 00 00 00\\n'";
    let toml = format!(
        "{}\n[[connectors.hcidump]]\nid = \"remote\"\ncommand = [\"sh\", \"-c\", \"{script}\"]\n",
        living_room(&server.url())
    );

    let hub = Hub::start(config(&toml));
    assert_eq!(hub.connectors(), 1);

    assert!(hub.queue().offer("test:remote:POWER:short-pressed".to_string()).await);
    wait_for(&on).await;
    wait_for(&volume_up).await;

    hub.shutdown();
}
