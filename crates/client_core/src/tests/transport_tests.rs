use super::*;
use shared::protocol::DeviceCommand;
use tokio::sync::mpsc;

#[tokio::test]
async fn channel_sink_queues_and_drops_when_full() {
    let (mut tx, mut rx) = mpsc::channel(1);
    tx.dispatch(Command::new(&DeviceCommand::StartDomination, DeviceId::new("T1")));
    tx.dispatch(Command::new(&DeviceCommand::ForceEndGame, DeviceId::new("T1")));

    let first = rx.recv().await.expect("queued command");
    assert_eq!(first.text, "CMD:START_DOM_GAME;");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn closed_channel_sink_does_not_panic() {
    let (mut tx, rx) = mpsc::channel::<Command>(4);
    drop(rx);
    tx.dispatch(Command::new(&DeviceCommand::ForceEndGame, DeviceId::new("T1")));
}

#[tokio::test]
async fn udp_link_round_trips_between_console_and_terminal() {
    let terminal = UdpSocket::bind("127.0.0.1:0").await.expect("bind terminal");
    let terminal_port = terminal.local_addr().expect("terminal addr").port();
    let link = UdpLink::bind("127.0.0.1:0", terminal_port)
        .await
        .expect("bind link");

    let command = Command::new(&DeviceCommand::StartSearchDestroy, DeviceId::new("127.0.0.1"));
    link.send(&command).await.expect("send");

    let mut buf = [0u8; 64];
    let (len, from) = terminal.recv_from(&mut buf).await.expect("recv");
    assert_eq!(&buf[..len], b"CMD:START_SD_GAME;");

    terminal
        .send_to(b"event:mode_enter;mode:sd;", from)
        .await
        .expect("reply");
    let datagram = link.recv().await.expect("datagram");
    assert_eq!(datagram.device_id, DeviceId::new("127.0.0.1"));
    assert_eq!(datagram.text, "event:mode_enter;mode:sd;");
}

#[tokio::test]
async fn non_ip_terminal_ids_are_rejected() {
    let link = UdpLink::bind("127.0.0.1:0", 1234).await.expect("bind link");
    let command = Command::new(&DeviceCommand::ForceEndGame, DeviceId::new("T1"));
    assert!(matches!(
        link.send(&command).await,
        Err(TransportError::BadAddress(_))
    ));
}
