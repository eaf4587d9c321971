#![allow(dead_code)]

use std::path::Path;

use wsng::handler::{Dispatcher, Outcome};
use wsng::http::mime::ContentTypes;

/// A response split into its status line, header lines and body.
pub struct Reply {
    pub status_line: String,
    pub headers: Vec<String>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn parse(raw: &[u8]) -> Self {
        let split = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("no blank line after headers");
        let head = std::str::from_utf8(&raw[..split]).unwrap();
        let mut lines = head.split("\r\n").map(str::to_string);

        Self {
            status_line: lines.next().unwrap(),
            headers: lines.collect(),
            body: raw[split + 4..].to_vec(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status_line.split(' ').nth(1).unwrap().parse().unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            (key == name).then(|| value.trim())
        })
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub fn types() -> ContentTypes {
    [
        ("html", "text/html"),
        ("txt", "text/plain"),
        ("css", "text/css"),
        ("png", "image/png"),
    ]
    .into_iter()
    .collect()
}

pub fn dispatcher(root: &Path) -> Dispatcher {
    Dispatcher::new(root, types()).unwrap()
}

pub async fn dispatch(dispatcher: &Dispatcher, line: &str) -> (Outcome, Vec<u8>) {
    let mut out = Vec::new();
    let outcome = dispatcher.dispatch(line, &mut out).await.unwrap();
    (outcome, out)
}

#[cfg(unix)]
pub fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, body).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
pub fn chmod(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).unwrap();
}
