use std::{future, io, net::SocketAddr, path::PathBuf, sync::Arc};

use machine_learning::{Classifier, PipelineSpec};
use server::AppState;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

const SPECIES: [&str; 3] = ["Adelie", "Gentoo", "Chinstrap"];

fn penguins_excerpt() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data/fixtures/penguins_excerpt.csv")
}

async fn spawn_server() -> io::Result<SocketAddr> {
    let classifier = Classifier::train(penguins_excerpt(), &PipelineSpec::default())
        .map_err(io::Error::other)?;
    let state = Arc::new(AppState::new(classifier).map_err(io::Error::other)?);

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(server::serve(listener, state, future::pending()));

    Ok(addr)
}

/// Sends one request and returns the status code and body of the response.
async fn request(addr: SocketAddr, method: &str, target: &str) -> io::Result<(u16, String)> {
    let mut stream = TcpStream::connect(addr).await?;
    let req = format!(
        "{method} {target} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Length: 0\r\n\r\n"
    );
    stream.write_all(req.as_bytes()).await?;

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await?;

    let (head, body) = raw
        .split_once("\r\n\r\n")
        .ok_or_else(|| io::Error::other("response without a body separator"))?;
    let status = head
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| io::Error::other("response without a status code"))?;

    Ok((status, body.to_string()))
}

fn variety(page: &str) -> Option<&str> {
    SPECIES
        .into_iter()
        .find(|species| page.contains(&format!("The penguin is a {species}")))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn landing_page_ignores_the_query() -> io::Result<()> {
    let addr = spawn_server().await?;

    for target in ["/", "/?blmm=abc", "/?anything=else&x"] {
        let (status, body) = request(addr, "GET", target).await?;
        assert_eq!(status, 200);
        assert!(body.contains("<form action=\"/classify\""));
    }

    let (status, _) = request(addr, "POST", "/").await?;
    assert_eq!(status, 200);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn classify_renders_the_species() -> io::Result<()> {
    let addr = spawn_server().await?;

    let (status, body) = request(
        addr,
        "GET",
        "/classify?blmm=39.1&bdmm=18.7&flmm=181&bmg=3750",
    )
    .await?;

    assert_eq!(status, 200);
    assert_eq!(variety(&body), Some("Adelie"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn post_reads_the_query_string_too() -> io::Result<()> {
    let addr = spawn_server().await?;
    let target = "/classify?blmm=46.1&bdmm=13.2&flmm=211&bmg=4500";

    let (_, get_body) = request(addr, "GET", target).await?;
    let (status, post_body) = request(addr, "POST", target).await?;

    assert_eq!(status, 200);
    assert_eq!(variety(&post_body), Some("Gentoo"));
    assert_eq!(get_body, post_body);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn repeated_keys_use_their_first_value() -> io::Result<()> {
    let addr = spawn_server().await?;

    let (status, body) = request(
        addr,
        "GET",
        "/classify?blmm=39.1&blmm=40&bdmm=18.7&flmm=181&bmg=3750&bmg=heavy",
    )
    .await?;

    assert_eq!(status, 200);
    assert_eq!(variety(&body), Some("Adelie"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unseen_measurements_still_get_a_species() -> io::Result<()> {
    let addr = spawn_server().await?;

    let (status, body) = request(addr, "GET", "/classify?blmm=1&bdmm=2&flmm=3&bmg=4").await?;

    assert_eq!(status, 200);
    assert!(variety(&body).is_some(), "unexpected page: {body}");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failures_answer_a_plain_error() -> io::Result<()> {
    let addr = spawn_server().await?;

    let targets = [
        "/classify?blmm=abc&bdmm=18.7&flmm=181&bmg=3750",
        "/classify",
        "/classify?blmm=39.1&bdmm=18.7&flmm=181",
        "/classify?blmm=&bdmm=18.7&flmm=181&bmg=3750",
        "/classify?blmm=39.1&bdmm=18.7&flmm=181&bmg=inf",
        "/classify?blmm=-infinity&bdmm=18.7&flmm=181&bmg=3750",
        "/classify?blmm=39.1&bdmm=18.7&flmm=1e400&bmg=3750",
    ];
    for target in targets {
        let (status, body) = request(addr, "GET", target).await?;
        assert_eq!(status, 200, "{target}");
        assert_eq!(body, "Error", "{target}");
    }

    let (status, body) = request(addr, "POST", "/classify?bmg=heavy").await?;
    assert_eq!(status, 200);
    assert_eq!(body, "Error");
    Ok(())
}
