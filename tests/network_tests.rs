use oob_prober::{App, ScanConfig, ScanSettings};
use std::io::Read;
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use common::{write_inputs, MemorySink};

mod common;

#[test]
fn test_requests_reach_a_loopback_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let mut requests = Vec::new();
        for _ in 0..2 {
            let (mut conn, _) = listener.accept().unwrap();
            let mut body = String::new();
            conn.read_to_string(&mut body).unwrap();
            requests.push(body);
        }
        requests
    });

    let (_dir, domains, paths) = write_inputs(&format!("127.0.0.1 {port}\n"), "/a\n/b\n");
    let settings = ScanSettings {
        domain_file: domains,
        path_file: paths,
        config: ScanConfig {
            threads: 2,
            method: "POST".into(),
            collaborator_host: "col.example".into(),
            ..ScanConfig::default()
        },
    };
    let report = App::load(settings, Arc::new(MemorySink::default()))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(report.sent, 2);

    let mut requests = server.join().unwrap();
    requests.sort();
    assert!(requests[0].starts_with("POST /a?domain=127.0.0.1 HTTP/1.1\r\nHost: col.example\r\n"));
    assert!(requests[1].starts_with("POST /b?domain=127.0.0.1 HTTP/1.1\r\nHost: col.example\r\n"));
    assert!(requests.iter().all(|r| r.ends_with("Connection: Close\r\n\r\n")));
}

#[test]
fn test_unreachable_target_is_logged_not_fatal() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let (_dir, domains, paths) = write_inputs(&format!("127.0.0.1 {port}\n"), "/a\n");
    let sink = Arc::new(MemorySink::default());
    let settings = ScanSettings {
        domain_file: domains,
        path_file: paths,
        config: ScanConfig {
            threads: 1,
            collaborator_host: "col.example".into(),
            ..ScanConfig::default()
        },
    };
    let report = App::load(settings, sink.clone()).unwrap().run().unwrap();

    assert_eq!(report.attempted, 1);
    assert_eq!(report.dial_failures, 1);
    assert!(sink
        .lines()
        .iter()
        .any(|(_, line)| line.contains(&format!("127.0.0.1:{port}")) && line.contains("dial_failed")));
}
