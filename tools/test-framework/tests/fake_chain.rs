//! Runs path discovery and the path checks against a fake chain binary,
//! a shell script answering the IBC queries with canned JSON, and a fake
//! REST endpoint serving bank balances.

#![cfg(unix)]

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use once_cell::sync::OnceCell;

use lumera_ibc_test_framework::framework::path::RunIbcPathTest;
use lumera_ibc_test_framework::prelude::*;
use lumera_ibc_test_framework::util::random::scratch_dir;

// Writing an executable while another test forks can fail with ETXTBSY.
static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

const CHANNELS: &str = r#"{
  "channels": [
    {
      "state": "STATE_OPEN",
      "ordering": "ORDER_UNORDERED",
      "counterparty": {"port_id": "transfer", "channel_id": "channel-4"},
      "connection_hops": ["connection-1"],
      "version": "ics20-1",
      "port_id": "transfer",
      "channel_id": "channel-1"
    },
    {
      "state": "STATE_OPEN",
      "ordering": "ORDER_UNORDERED",
      "counterparty": {"port_id": "transfer", "channel_id": "channel-0"},
      "connection_hops": ["connection-0"],
      "version": "ics20-1",
      "port_id": "transfer",
      "channel_id": "channel-0"
    }
  ],
  "pagination": {"next_key": null, "total": "2"},
  "height": {"revision_number": "0", "revision_height": "211"}
}"#;

const CONNECTIONS: &str = r#"{
  "connections": [
    {
      "id": "connection-0",
      "client_id": "07-tendermint-0",
      "versions": [{"identifier": "1", "features": ["ORDER_ORDERED", "ORDER_UNORDERED"]}],
      "state": "STATE_OPEN",
      "counterparty": {
        "client_id": "07-tendermint-0",
        "connection_id": "connection-0",
        "prefix": {"key_prefix": "aWJj"}
      },
      "delay_period": "0"
    }
  ],
  "pagination": {"next_key": null, "total": "1"}
}"#;

const CLIENT_STATE: &str = r#"{
  "identified_client_state": {
    "client_id": "07-tendermint-0",
    "client_state": {
      "@type": "/ibc.lightclients.tendermint.v1.ClientState",
      "chain_id": "hermes-simd-1",
      "latest_height": {"revision_number": "1", "revision_height": "187"}
    }
  },
  "proof": null
}"#;

const BANK_BALANCES: &str = r#"{
  "balances": [
    {"denom": "ulume", "amount": "1000000"},
    {"denom": "ibc/27394FB092D2ECCD", "amount": "42"}
  ],
  "pagination": {"next_key": null, "total": "2"}
}"#;

const CHANNEL_INFO: &str = r#"{
  "port_id": "transfer",
  "channel_id": "channel-0",
  "a_chain_id": "lumera-devnet-1",
  "b_chain_id": "hermes-simd-1"
}"#;

/**
   A directory holding the fake chain binary together with the responses
   it serves. Every invocation is appended to `calls.log`.
*/
struct FakeChain {
    dir: PathBuf,
}

impl FakeChain {
    fn new() -> Self {
        let fake = Self {
            dir: scratch_dir("fake-chain").unwrap(),
        };

        fake.file("channels.json", CHANNELS);
        fake.file("connections.json", CONNECTIONS);
        // Some binaries print YAML even when asked for JSON.
        fake.file("client_status.json", "status: Active\n");
        fake.file("client_state.json", CLIENT_STATE);
        fake.file("bank_balances.json", BANK_BALANCES);

        fake.file("channel_transfer.json", CHANNEL_INFO);
        fake.file("recipient.address", "  cosmos1recipient\n");

        let dir = fake.dir.display();
        let script = format!(
            r#"#!/bin/sh
echo "$@" >> "{dir}/calls.log"
case "$*" in
  *"q ibc channel channels"*) cat "{dir}/channels.json" ;;
  *"q ibc connection connections"*) cat "{dir}/connections.json" ;;
  *"q ibc client status"*) cat "{dir}/client_status.json" ;;
  *"q ibc channel client-state"*) cat "{dir}/client_state.json" ;;
  *"q bank balances"*) cat "{dir}/bank_balances.json" ;;
  *"tx ibc-transfer transfer"*) echo '{{"code":0,"txhash":"0A1B"}}' ;;
  *) echo "unknown command: $*" >&2; exit 1 ;;
esac
"#
        );

        let path = fake.binary();
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        fake
    }

    fn binary(&self) -> PathBuf {
        self.dir.join("fake-chaind")
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn calls(&self) -> String {
        fs::read_to_string(self.dir.join("calls.log")).unwrap_or_default()
    }

    fn env(&self, rest_address: &str) -> BTreeMap<String, String> {
        let path = |name: &str| self.dir.join(name).display().to_string();

        [
            ("LUMERA_BIN", self.binary().display().to_string()),
            ("SIMD_BIN", self.binary().display().to_string()),
            ("LUMERA_KEY_NAME", "relayer".to_string()),
            ("LUMERA_VALIDATORS_FILE", path("validators.json")),
            ("CHANNEL_INFO_FILE", path("channel_transfer.json")),
            ("SIMD_RECIPIENT_ADDR_FILE", path("recipient.address")),
            ("LUMERA_RECIPIENT_ADDR_FILE", path("recipient.address")),
            ("SIMD_REST_ADDR", rest_address.to_string()),
            ("LUMERA_REST_ADDR", rest_address.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    fn config(&self, side: SuiteSide) -> TestConfig {
        TestConfig::from_env(side, &self.env("http://127.0.0.1:1"))
    }
}

/**
   Serve the given balance responses in order, one per request, repeating
   the last one. Returns the endpoint address and a request counter.
*/
fn serve_balances(bodies: Vec<String>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());

    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };

            read_request(&mut stream);

            let index = counter.fetch_add(1, Ordering::SeqCst);
            let body = &bodies[index.min(bodies.len() - 1)];

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (address, hits)
}

fn read_request(stream: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];

    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
}

fn balances(denom: &str, amount: u128) -> String {
    format!(
        r#"{{"balances":[{{"denom":"ustake","amount":"7"}},{{"denom":"{denom}","amount":"{amount}"}}],"pagination":{{"next_key":null,"total":"2"}}}}"#
    )
}

#[test_log::test]
fn lumera_side_discovers_healthy_path() -> Result<(), Error> {
    let _guard = serial();
    let fake = FakeChain::new();

    let path = bootstrap_ibc_path(&fake.config(SuiteSide::Lumera))?;

    assert_eq!(path.port_id, "transfer");
    assert_eq!(path.channel.channel_id, "channel-0");
    assert_eq!(path.connection.id, "connection-0");
    assert_eq!(path.recipient, "cosmos1recipient");
    assert_eq!(path.channel_info.counterparty_chain_id, "hermes-simd-1");
    assert_eq!(path.channels.len(), 2);
    assert_eq!(path.client_status, "Active");
    assert_eq!(path.client_state.latest_height, 187);

    path.assert_channel_open()?;
    path.assert_connection_open()?;
    path.assert_client_active()?;
    path.assert_channel_client_state()?;
    path.assert_counterparty_channel()?;

    let calls = fake.calls();
    assert!(calls.contains("q ibc client status 07-tendermint-0"), "{calls}");
    assert!(
        calls.contains("q ibc channel client-state transfer channel-0 --output json --node"),
        "{calls}"
    );

    Ok(())
}

#[test_log::test]
fn discovery_is_repeatable() -> Result<(), Error> {
    let _guard = serial();
    let fake = FakeChain::new();
    let config = fake.config(SuiteSide::Lumera);

    let first = bootstrap_ibc_path(&config)?;
    let second = bootstrap_ibc_path(&config)?;

    assert_eq!(first, second);

    Ok(())
}

#[test_log::test]
fn simd_side_falls_back_to_first_channel_and_open_connection() -> Result<(), Error> {
    let _guard = serial();
    let fake = FakeChain::new();

    let mut env = fake.env("http://127.0.0.1:1");
    env.insert("LUMERA_CHANNEL_ID".to_string(), "channel-9".to_string());

    fake.file(
        "connections.json",
        &CONNECTIONS.replace(r#""id": "connection-0""#, r#""id": "connection-7""#),
    );

    let path = bootstrap_ibc_path(&TestConfig::from_env(SuiteSide::Simd, &env))?;

    assert_eq!(path.target_channel_id, "channel-9");
    assert_eq!(path.channel.channel_id, "channel-1");
    assert_eq!(path.connection.id, "connection-7");

    let err = path.assert_counterparty_channel().unwrap_err();
    assert!(
        err.to_string().contains("counterparty channel mismatch"),
        "{err}"
    );

    Ok(())
}

#[test_log::test]
fn simd_side_matches_counterparty_channel() -> Result<(), Error> {
    let _guard = serial();
    let fake = FakeChain::new();

    let mut env = fake.env("http://127.0.0.1:1");
    env.insert("LUMERA_CHANNEL_ID".to_string(), "channel-4".to_string());

    let path = bootstrap_ibc_path(&TestConfig::from_env(SuiteSide::Simd, &env))?;

    assert_eq!(path.channel.channel_id, "channel-1");
    path.assert_counterparty_channel()?;

    Ok(())
}

#[test_log::test]
fn topology_mismatches_are_fatal() {
    let _guard = serial();
    let fake = FakeChain::new();

    let mut env = fake.env("http://127.0.0.1:1");
    env.insert("CHANNEL_ID".to_string(), "channel-5".to_string());
    let err = bootstrap_ibc_path(&TestConfig::from_env(SuiteSide::Lumera, &env)).unwrap_err();
    assert!(matches!(err.detail(), ErrorDetail::ChannelNotFound(_)));

    fake.file(
        "channels.json",
        &CHANNELS.replace(r#"["connection-0"]"#, "[]"),
    );
    let err = bootstrap_ibc_path(&fake.config(SuiteSide::Lumera)).unwrap_err();
    assert!(matches!(err.detail(), ErrorDetail::MissingConnectionHop(_)));

    fake.file("channels.json", CHANNELS);
    fake.file(
        "connections.json",
        &CONNECTIONS.replace(r#""client_id": "07-tendermint-0","#, r#""client_id": "","#),
    );
    let err = bootstrap_ibc_path(&fake.config(SuiteSide::Lumera)).unwrap_err();
    assert!(matches!(err.detail(), ErrorDetail::MissingClientId(_)));

    fake.file("connections.json", CONNECTIONS);
    fake.file("client_status.json", "{}");
    let err = bootstrap_ibc_path(&fake.config(SuiteSide::Lumera)).unwrap_err();
    assert!(matches!(err.detail(), ErrorDetail::MissingField(_)));
}

#[test_log::test]
fn missing_inputs_are_fatal() {
    let _guard = serial();
    let fake = FakeChain::new();

    fake.file("channel_transfer.json", r#"{"port_id":"transfer"}"#);
    let err = bootstrap_ibc_path(&fake.config(SuiteSide::Lumera)).unwrap_err();
    assert!(matches!(err.detail(), ErrorDetail::MissingChannelId(_)));

    fake.file("channel_transfer.json", CHANNEL_INFO);
    fake.file("recipient.address", "\n");
    let err = bootstrap_ibc_path(&fake.config(SuiteSide::Lumera)).unwrap_err();
    assert!(matches!(err.detail(), ErrorDetail::EmptyAddressFile(_)));

    fake.file("recipient.address", "cosmos1recipient");
    let mut env = fake.env("http://127.0.0.1:1");
    env.insert("LUMERA_BIN".to_string(), "/nonexistent/lumerad".to_string());
    let err = bootstrap_ibc_path(&TestConfig::from_env(SuiteSide::Lumera, &env)).unwrap_err();
    assert!(matches!(err.detail(), ErrorDetail::CommandNotFound(_)));
}

#[test_log::test]
fn transfer_waits_for_voucher_balance() -> Result<(), Error> {
    let _guard = serial();
    let fake = FakeChain::new();

    let config = fake.config(SuiteSide::Lumera);
    let denom = bootstrap_ibc_path(&config)?.voucher_denom("ulume")?;

    let (rest_address, hits) = serve_balances(vec![
        balances(denom.as_str(), 5),
        balances(denom.as_str(), 5),
        balances(denom.as_str(), 105),
    ]);

    let path = bootstrap_ibc_path(&TestConfig::from_env(
        SuiteSide::Lumera,
        &fake.env(&rest_address),
    ))?;

    let outcome =
        path.assert_transfer_relayed(RetryPolicy::new(5, Duration::from_millis(10)))?;

    assert_eq!(outcome.denom, denom);
    assert_eq!(outcome.before, 5);
    assert_eq!(outcome.after, 105);
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    let calls = fake.calls();
    assert!(
        calls.contains(
            "tx ibc-transfer transfer transfer channel-0 cosmos1recipient 100ulume --from relayer"
        ),
        "{calls}"
    );
    assert!(calls.contains("--packet-timeout-timestamp 600000000000"), "{calls}");
    assert!(calls.contains("--gas-prices 0.025ulume"), "{calls}");

    Ok(())
}

#[test_log::test]
fn transfer_reports_last_balance_on_timeout() -> Result<(), Error> {
    let _guard = serial();
    let fake = FakeChain::new();

    let (rest_address, hits) =
        serve_balances(vec![r#"{"code":5,"message":"not found"}"#.to_string()]);

    let path = bootstrap_ibc_path(&TestConfig::from_env(
        SuiteSide::Lumera,
        &fake.env(&rest_address),
    ))?;

    let err = path
        .assert_transfer_relayed(RetryPolicy::new(3, Duration::from_millis(10)))
        .unwrap_err();

    match err.detail() {
        ErrorDetail::BalanceTimeout(e) => {
            assert_eq!(e.attempts, 3);
            assert_eq!(e.last_observed, 0);
            assert_eq!(e.address, "cosmos1recipient");
        }
        _ => panic!("unexpected error: {err}"),
    }

    assert_eq!(hits.load(Ordering::SeqCst), 4);

    Ok(())
}

#[test_log::test]
fn chain_driver_queries_bank_balance() -> Result<(), Error> {
    let _guard = serial();
    let fake = FakeChain::new();

    let driver = ChainDriver::from_config(&fake.config(SuiteSide::Lumera).chain);

    assert_eq!(driver.query_balance("cosmos1recipient", "ulume")?, 1_000_000);
    assert_eq!(
        driver.query_balance("cosmos1recipient", "ibc/27394FB092D2ECCD")?,
        42
    );
    assert_eq!(driver.query_balance("cosmos1recipient", "uatom")?, 0);

    let calls = fake.calls();
    assert!(
        calls.contains("q bank balances cosmos1recipient --output json"),
        "{calls}"
    );

    fake.file("bank_balances.json", "not json or yaml: [");
    let err = driver.query_balance("cosmos1recipient", "ulume").unwrap_err();
    assert!(matches!(err.detail(), ErrorDetail::JsonParse(_)), "{err}");

    Ok(())
}

struct RecordConnection {
    seen: Mutex<Vec<String>>,
}

impl IbcPathTest for RecordConnection {
    fn run(&self, config: &TestConfig, path: &IbcPathContext) -> Result<(), Error> {
        assert_eq!(config.side, SuiteSide::Lumera);

        self.seen
            .lock()
            .unwrap()
            .push(path.connection.id.clone());

        Ok(())
    }
}

#[test_log::test]
fn path_runner_discovers_once_and_writes_env_file() -> Result<(), Error> {
    let _guard = serial();
    let fake = FakeChain::new();

    let env_file = fake.dir.join("path.env");

    let mut vars = fake.env("http://127.0.0.1:1");
    vars.insert(
        "IBC_PATH_ENV_FILE".to_string(),
        env_file.display().to_string(),
    );

    for (key, value) in vars.iter() {
        std::env::set_var(key, value);
    }

    let snapshot = OnceCell::new();
    let test = RecordConnection {
        seen: Mutex::new(Vec::new()),
    };

    let first = run_test(&RunIbcPathTest::new(SuiteSide::Lumera, &snapshot, &test));
    let second = run_test(&RunIbcPathTest::new(SuiteSide::Lumera, &snapshot, &test));

    for key in vars.keys() {
        std::env::remove_var(key);
    }

    first?;
    second?;

    assert_eq!(
        *test.seen.lock().unwrap(),
        vec!["connection-0".to_string(), "connection-0".to_string()]
    );

    let calls = fake.calls();
    assert_eq!(calls.matches("q ibc channel channels").count(), 1, "{calls}");

    let written = fs::read_to_string(&env_file).unwrap();
    let lines: Vec<&str> = written.lines().collect();

    assert!(lines.contains(&"PORT_ID=transfer"), "{written}");
    assert!(lines.contains(&"CHANNEL_ID=channel-0"), "{written}");
    assert!(lines.contains(&"CONNECTION_ID=connection-0"), "{written}");
    assert!(lines.contains(&"CLIENT_ID=07-tendermint-0"), "{written}");
    assert!(lines.contains(&"RECIPIENT=cosmos1recipient"), "{written}");
    assert!(
        lines.contains(&"COUNTERPARTY_CHAIN_ID=hermes-simd-1"),
        "{written}"
    );

    Ok(())
}
