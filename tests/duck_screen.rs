use image::codecs::gif::GifEncoder;
use image::{Delay, Rgba, RgbaImage};
use randuck::client::DuckClient;
use randuck::mobile::{DuckMobile, MobileImageKind, MobilePhase};
use randuck::orchestrator::{FetchOrchestrator, InitialOutcome, Lifecycle};
use randuck::presenter::{self, Presentation, Viewport};
use randuck::screen::{Phase, ScreenState};
use std::sync::Arc;

fn two_frame_gif() -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut out);
        let frames = [[200u8, 150, 0, 255], [20, 90, 200, 255]].map(|px| {
            image::Frame::from_parts(
                RgbaImage::from_pixel(12, 8, Rgba(px)),
                0,
                0,
                Delay::from_numer_denom_ms(80, 1),
            )
        });
        encoder.encode_frames(frames).unwrap();
    }
    out
}

#[tokio::test]
async fn test_gif_duck_mounts_and_animates() {
    let mut server = mockito::Server::new_async().await;
    let gif_url = format!("{}/ducks/duck2.gif", server.url());
    let _api = server
        .mock("GET", "/random")
        .with_status(200)
        .with_body(format!(r#"{{"url":"{}"}}"#, gif_url))
        .create_async()
        .await;
    let _img = server
        .mock("GET", "/ducks/duck2.gif")
        .with_status(200)
        .with_header("content-type", "image/gif")
        .with_body(two_frame_gif())
        .create_async()
        .await;

    let client = Arc::new(DuckClient::new(&format!("{}/random", server.url())).unwrap());
    let orch = FetchOrchestrator::new(Arc::clone(&client));
    let mut lifecycle = Lifecycle::new();
    let mut screen = ScreenState::new(false);

    match orch.initial(lifecycle.show()).await {
        InitialOutcome::Mounted(duck) => screen.apply_initial(Ok(duck)),
        other => panic!("expected a duck, got {:?}", other),
    }
    assert_eq!(screen.phase(), Phase::Ready(gif_url.as_str()));

    let shown = presenter::present(client.as_ref(), &gif_url, Viewport::square(6)).await;
    match shown {
        Presentation::Animation(anim) => {
            assert_eq!(anim.frames().len(), 2);
            assert!(anim.frames().iter().all(|f| f.width == 6 && f.height == 6));
        }
        other => panic!("expected animation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_mobile_refresh_cycle() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", "/random")
        .with_status(200)
        .with_body(r#"{"url":"https://example.com/url1.jpg"}"#)
        .expect(1)
        .create_async()
        .await;

    let mobile = DuckMobile::with_api_url(format!("{}/random", server.url()), false);
    let screen = mobile.start().await.unwrap();
    assert_eq!(screen.phase, MobilePhase::Ready);
    assert_eq!(screen.image_url.as_deref(), Some("https://example.com/url1.jpg"));
    assert_eq!(screen.image_kind, Some(MobileImageKind::Static));
    first.assert_async().await;
    first.remove_async().await;

    // Refresh fails: previous duck stays, no error shown.
    let failing = server
        .mock("GET", "/random")
        .with_status(500)
        .create_async()
        .await;
    let screen = mobile.refresh().await.unwrap();
    assert_eq!(screen.phase, MobilePhase::Ready);
    assert_eq!(screen.image_url.as_deref(), Some("https://example.com/url1.jpg"));
    assert_eq!(screen.error, None);
    assert!(!screen.is_loading);
    failing.remove_async().await;

    // Refresh succeeds: new duck.
    let _second = server
        .mock("GET", "/random")
        .with_status(200)
        .with_body(r#"{"url":"https://example.com/url2.gif"}"#)
        .create_async()
        .await;
    let screen = mobile.refresh().await.unwrap();
    assert_eq!(screen.image_url.as_deref(), Some("https://example.com/url2.gif"));
    assert_eq!(screen.image_kind, Some(MobileImageKind::Animated));
}

#[tokio::test]
async fn test_mobile_initial_failure_never_mounts() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mobile = DuckMobile::with_api_url(format!("http://127.0.0.1:{}/random", port), false);
    let screen = mobile.start().await.unwrap();
    assert_eq!(screen.phase, MobilePhase::NeverMounted);
    assert_eq!(screen.image_url, None);

    // Nothing can bring it back.
    let screen = mobile.refresh().await.unwrap();
    assert_eq!(screen.phase, MobilePhase::NeverMounted);
}

#[tokio::test]
async fn test_mobile_visible_errors() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("GET", "/random")
        .with_status(200)
        .with_body(r#"{"url":"https://example.com/url1.jpg"}"#)
        .create_async()
        .await;
    let mobile = DuckMobile::with_api_url(format!("{}/random", server.url()), true);
    mobile.start().await.unwrap();
    ok.remove_async().await;

    let _bad = server
        .mock("GET", "/random")
        .with_status(200)
        .with_body("<html>teapot</html>")
        .create_async()
        .await;
    let screen = mobile.refresh().await.unwrap();
    assert_eq!(screen.phase, MobilePhase::Failed);
    assert!(screen.error.unwrap().starts_with("protocol error"));

    let screen = mobile.dismiss_error().await;
    assert_eq!(screen.phase, MobilePhase::Ready);
}

#[tokio::test]
async fn test_mobile_empty_url_renders_placeholder() {
    let mut server = mockito::Server::new_async().await;
    let _api = server
        .mock("GET", "/random")
        .with_status(200)
        .with_body(r#"{"url":""}"#)
        .create_async()
        .await;
    let mobile = DuckMobile::with_api_url(format!("{}/random", server.url()), false);
    let screen = mobile.start().await.unwrap();
    assert_eq!(screen.phase, MobilePhase::Ready);
    assert_eq!(screen.image_kind, Some(MobileImageKind::Static));
    assert!(mobile.load_image(String::new()).await.is_none());
}

#[tokio::test]
async fn test_mobile_destroy_cancels_refresh() {
    let mut server = mockito::Server::new_async().await;
    let _api = server
        .mock("GET", "/random")
        .with_status(200)
        .with_body(r#"{"url":"https://example.com/url1.jpg"}"#)
        .create_async()
        .await;
    let mobile = DuckMobile::with_api_url(format!("{}/random", server.url()), false);
    mobile.start().await.unwrap();
    mobile.destroy();

    let screen = mobile.refresh().await.unwrap();
    assert!(!screen.is_loading);
    assert_eq!(screen.image_url.as_deref(), Some("https://example.com/url1.jpg"));
}
