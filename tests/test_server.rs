mod common;

use std::io::{Read as _, Write as _};
use std::sync::Arc;
use std::time::Duration;

use common::{Reply, dispatcher, write_script};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct Running {
    addr: std::net::SocketAddr,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<anyhow::Result<()>>,
}

async fn start(root: &std::path::Path) -> Running {
    let listener = wsng::server::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let handle = tokio::spawn(wsng::server::serve(
        listener,
        Arc::new(dispatcher(root)),
        async {
            let _ = stopped.await;
        },
    ));

    Running { addr, stop, handle }
}

async fn roundtrip(addr: std::net::SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut response))
        .await
        .expect("server did not close the connection")
        .unwrap();
    response
}

#[tokio::test]
async fn test_serves_file_over_tcp() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("hello.html"), "<p>hello</p>").unwrap();
    let server = start(root.path()).await;

    let raw = roundtrip(
        server.addr,
        b"GET /hello.html HTTP/1.0\r\nHost: localhost\r\nUser-Agent: test\r\n\r\n",
    )
    .await;
    let reply = Reply::parse(&raw);

    assert_eq!(reply.status_line, "HTTP/1.0 200 OK");
    assert_eq!(reply.header("Content-Type"), Some("text/html"));
    assert_eq!(reply.body_text(), "<p>hello</p>");

    server.stop.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_concurrent_connections() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("a.txt"), "a").unwrap();
    let server = start(root.path()).await;

    // A client that never finishes its headers must not hold up others
    let mut idle = TcpStream::connect(server.addr).await.unwrap();
    idle.write_all(b"GET /a.txt HTTP/1.0\r\n").await.unwrap();

    let mut clients = Vec::new();
    for _ in 0..8 {
        let addr = server.addr;
        clients.push(tokio::spawn(async move {
            roundtrip(addr, b"GET /a.txt HTTP/1.0\r\n\r\n").await
        }));
    }
    for client in clients {
        let reply = Reply::parse(&client.await.unwrap());
        assert_eq!(reply.status(), 200);
        assert_eq!(reply.body_text(), "a");
    }

    drop(idle);
    server.stop.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_bad_requests_over_tcp() {
    let root = tempfile::tempdir().unwrap();
    let server = start(root.path()).await;

    let reply = Reply::parse(&roundtrip(server.addr, b"GET\r\n\r\n").await);
    assert_eq!(reply.status(), 400);

    let reply = Reply::parse(&roundtrip(server.addr, b"DELETE /x HTTP/1.0\r\n\r\n").await);
    assert_eq!(reply.status(), 501);

    // Request line without a header block, closed by the client
    let reply = Reply::parse(&roundtrip(server.addr, b"GET /nope HTTP/1.0\n").await);
    assert_eq!(reply.status(), 404);

    server.stop.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_cgi_writes_to_socket() {
    let root = tempfile::tempdir().unwrap();
    write_script(
        &root.path().join("hello.cgi"),
        "#!/bin/sh\n\
         printf 'Content-Type: text/plain\\r\\n\\r\\n'\n\
         echo \"hello $QUERY_STRING\"\n",
    );
    let server = start(root.path()).await;

    let raw = roundtrip(server.addr, b"GET /hello.cgi?world HTTP/1.0\r\n\r\n").await;
    let reply = Reply::parse(&raw);

    assert_eq!(reply.status(), 200);
    assert_eq!(reply.header("Server"), Some("WSNG/1"));
    assert_eq!(reply.header("Content-Type"), Some("text/plain"));
    assert_eq!(reply.body_text(), "hello world\n");

    server.stop.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_shutdown_closes_listener() {
    let root = tempfile::tempdir().unwrap();
    let server = start(root.path()).await;
    let addr = server.addr;

    server.stop.send(()).unwrap();
    server.handle.await.unwrap().unwrap();

    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_cgi_launch_failure_leaves_bare_header() {
    let root = tempfile::tempdir().unwrap();
    write_script(&root.path().join("bad.cgi"), "#!/nonexistent/interp\necho never\n");
    std::fs::write(root.path().join("ok.txt"), "ok").unwrap();
    let server = start(root.path()).await;

    let raw = roundtrip(server.addr, b"GET /bad.cgi HTTP/1.0\r\n\r\n").await;
    let text = String::from_utf8(raw).unwrap();
    let lines: Vec<&str> = text.split("\r\n").collect();

    assert_eq!(lines.len(), 4, "unexpected response {:?}", text);
    assert_eq!(lines[0], "HTTP/1.0 200 OK");
    assert!(lines[1].starts_with("Date: "));
    assert_eq!(lines[2], "Server: WSNG/1");
    assert_eq!(lines[3], "");

    // The server is still taking calls
    let reply = Reply::parse(&roundtrip(server.addr, b"GET /ok.txt HTTP/1.0\r\n\r\n").await);
    assert_eq!(reply.status(), 200);
    assert_eq!(reply.body_text(), "ok");

    server.stop.send(()).unwrap();
    server.handle.await.unwrap().unwrap();
}

#[test]
fn test_shutdown_lets_running_worker_finish() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("a.txt"), "still here").unwrap();
    let d = Arc::new(dispatcher(root.path()));

    let rt = tokio::runtime::Runtime::new().unwrap();
    let listener = rt.block_on(wsng::server::bind("127.0.0.1:0")).unwrap();
    let addr = listener.local_addr().unwrap();

    // Request line sent, header block still open when shutdown arrives
    let mut client = std::net::TcpStream::connect(addr).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    client.write_all(b"GET /a.txt HTTP/1.0\r\n").unwrap();

    let finisher = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(500));
        client.write_all(b"\r\n").unwrap();
        let mut response = Vec::new();
        client.read_to_end(&mut response).unwrap();
        response
    });

    rt.block_on(wsng::server::serve(
        listener,
        d,
        async { tokio::time::sleep(Duration::from_millis(200)).await },
    ))
    .unwrap();
    // Same as returning from main
    drop(rt);

    let reply = Reply::parse(&finisher.join().unwrap());
    assert_eq!(reply.status(), 200);
    assert_eq!(reply.body_text(), "still here");
    assert!(std::net::TcpStream::connect(addr).is_err());
}
