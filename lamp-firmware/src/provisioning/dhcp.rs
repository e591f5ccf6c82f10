// Minimaler DHCP-Server für das Setup-Portal
//
// Clients im Setup-AP brauchen eine Adresse, um die Portal-Seite zu
// erreichen. Stateless: die angebotene Adresse wird deterministisch aus
// der Client-MAC abgeleitet, es gibt keine Lease-Tabelle.

use defmt::{Debug2Format, info, warn};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpEndpoint, Ipv4Address, Stack};

use crate::config::{SETUP_AP_ADDRESS, SETUP_AP_PREFIX_LEN};

// DHCP Message-Types (RFC 2132, Option 53)
const DHCP_DISCOVER: u8 = 1;
const DHCP_OFFER: u8 = 2;
const DHCP_REQUEST: u8 = 3;
const DHCP_ACK: u8 = 5;

// DHCP Options
const OPTION_SUBNET_MASK: u8 = 1;
const OPTION_ROUTER: u8 = 3;
const OPTION_MESSAGE_TYPE: u8 = 53;
const OPTION_LEASE_TIME: u8 = 51;
const OPTION_SERVER_ID: u8 = 54;
const OPTION_END: u8 = 255;

/// DHCP Magic Cookie (RFC 2131)
const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];

/// BOOTP-Header + Magic Cookie - kürzere Pakete sind ungültig
const MIN_PACKET_SIZE: usize = 240;

/// Lease-Dauer in Sekunden
/// Eine Stunde reicht locker - das Portal lebt nur Minuten
const LEASE_TIME_SECS: u32 = 3600;

/// Server- und Client-Ports laut RFC 2131
const DHCP_SERVER_PORT: u16 = 67;
const DHCP_CLIENT_PORT: u16 = 68;

/// Geparster DHCP-Request
struct DhcpRequest {
    /// Transaction ID
    xid: [u8; 4],
    /// Client MAC-Adresse
    client_mac: [u8; 6],
    /// Message-Type (DISCOVER, REQUEST, ...)
    message_type: u8,
}

/// Parst einen DHCP-Request aus einem rohen UDP-Paket
///
/// `None` wenn das Paket kein gültiger BOOTREQUEST ist
fn parse_request(packet: &[u8]) -> Option<DhcpRequest> {
    if packet.len() < MIN_PACKET_SIZE {
        return None;
    }

    // op muss BOOTREQUEST (1) sein
    if packet[0] != 1 {
        return None;
    }

    let mut xid = [0u8; 4];
    xid.copy_from_slice(&packet[4..8]);

    let mut client_mac = [0u8; 6];
    client_mac.copy_from_slice(&packet[28..34]);

    if packet[236..240] != MAGIC_COOKIE {
        return None;
    }

    // Message-Type aus den Options hinter dem Cookie
    let message_type =
        find_option(&packet[240..], OPTION_MESSAGE_TYPE).and_then(|data| data.first().copied())?;

    Some(DhcpRequest {
        xid,
        client_mac,
        message_type,
    })
}

/// Leitet eine Client-Adresse deterministisch aus der MAC ab
///
/// Ergebnis liegt in 192.168.4.2 - 192.168.4.50; die AP-Adresse .1
/// wird nie vergeben.
fn allocate_ip(mac: &[u8; 6]) -> Ipv4Address {
    let offset = (mac[5] % 49) + 2;
    Ipv4Address::new(
        SETUP_AP_ADDRESS[0],
        SETUP_AP_ADDRESS[1],
        SETUP_AP_ADDRESS[2],
        offset,
    )
}

/// Baut ein DHCP OFFER/ACK in den Buffer, gibt die Paket-Länge zurück
fn build_response(
    buffer: &mut [u8],
    request: &DhcpRequest,
    offered_ip: Ipv4Address,
    response_type: u8,
) -> usize {
    let server_ip = Ipv4Address::from(SETUP_AP_ADDRESS);
    let subnet_mask = prefix_to_mask(SETUP_AP_PREFIX_LEN);

    buffer.fill(0);

    // BOOTP-Header
    buffer[0] = 2; // op: BOOTREPLY
    buffer[1] = 1; // htype: Ethernet
    buffer[2] = 6; // hlen: MAC-Länge
    buffer[4..8].copy_from_slice(&request.xid);
    buffer[10..12].copy_from_slice(&[0x80, 0x00]); // Broadcast-Flag

    // yiaddr: die angebotene Client-Adresse
    buffer[16..20].copy_from_slice(&offered_ip.octets());
    // siaddr: der Server selbst
    buffer[20..24].copy_from_slice(&server_ip.octets());
    // chaddr: Client-Hardware-Adresse
    buffer[28..34].copy_from_slice(&request.client_mac);

    buffer[236..240].copy_from_slice(&MAGIC_COOKIE);

    // Options ab Offset 240
    let mut idx = 240;

    buffer[idx] = OPTION_MESSAGE_TYPE;
    buffer[idx + 1] = 1;
    buffer[idx + 2] = response_type;
    idx += 3;

    buffer[idx] = OPTION_SERVER_ID;
    buffer[idx + 1] = 4;
    buffer[idx + 2..idx + 6].copy_from_slice(&server_ip.octets());
    idx += 6;

    buffer[idx] = OPTION_LEASE_TIME;
    buffer[idx + 1] = 4;
    buffer[idx + 2..idx + 6].copy_from_slice(&LEASE_TIME_SECS.to_be_bytes());
    idx += 6;

    buffer[idx] = OPTION_SUBNET_MASK;
    buffer[idx + 1] = 4;
    buffer[idx + 2..idx + 6].copy_from_slice(&subnet_mask);
    idx += 6;

    buffer[idx] = OPTION_ROUTER;
    buffer[idx + 1] = 4;
    buffer[idx + 2..idx + 6].copy_from_slice(&server_ip.octets());
    idx += 6;

    buffer[idx] = OPTION_END;
    idx += 1;

    idx
}

/// Sucht eine Option im Options-Bereich (hinter dem Magic Cookie)
fn find_option(options: &[u8], option_code: u8) -> Option<&[u8]> {
    let mut i = 0;

    while i < options.len() {
        let code = options[i];
        if code == OPTION_END {
            break;
        }
        if code == 0 {
            // Padding
            i += 1;
            continue;
        }
        if i + 1 >= options.len() {
            break;
        }
        let len = options[i + 1] as usize;
        if i + 2 + len > options.len() {
            break;
        }
        if code == option_code {
            return Some(&options[i + 2..i + 2 + len]);
        }
        i += 2 + len;
    }
    None
}

/// Wandelt eine Präfix-Länge in eine Subnetz-Maske um
fn prefix_to_mask(prefix_len: u8) -> [u8; 4] {
    let mask = u32::MAX << (32 - u32::from(prefix_len));
    mask.to_be_bytes()
}

/// DHCP Server Task für das Setup-Portal
///
/// Beantwortet DISCOVER mit OFFER und REQUEST mit ACK; alles andere
/// wird ignoriert.
#[embassy_executor::task]
pub async fn dhcp_server_task(stack: &'static Stack<'static>) {
    info!("DHCP: Server starting on port {}", DHCP_SERVER_PORT);

    let mut rx_meta = [PacketMetadata::EMPTY; 8];
    let mut rx_buffer = [0u8; 1024];
    let mut tx_meta = [PacketMetadata::EMPTY; 8];
    let mut tx_buffer = [0u8; 1024];

    let mut socket = UdpSocket::new(
        *stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    if socket.bind(DHCP_SERVER_PORT).is_err() {
        warn!("DHCP: Failed to bind port {}", DHCP_SERVER_PORT);
        return;
    }

    let mut packet = [0u8; 576];
    let mut response = [0u8; 576];

    loop {
        let Ok((len, _remote)) = socket.recv_from(&mut packet).await else {
            continue;
        };

        let Some(request) = parse_request(&packet[..len]) else {
            continue;
        };

        let offered_ip = allocate_ip(&request.client_mac);
        let response_type = match request.message_type {
            DHCP_DISCOVER => DHCP_OFFER,
            DHCP_REQUEST => DHCP_ACK,
            _ => continue,
        };

        info!(
            "DHCP: {} -> client gets {}",
            if response_type == DHCP_OFFER {
                "OFFER"
            } else {
                "ACK"
            },
            Debug2Format(&offered_ip)
        );

        let response_len = build_response(&mut response, &request, offered_ip, response_type);

        // Antwort als Broadcast - der Client hat noch keine Adresse
        let destination = IpEndpoint::new(Ipv4Address::BROADCAST.into(), DHCP_CLIENT_PORT);
        if socket
            .send_to(&response[..response_len], destination)
            .await
            .is_err()
        {
            warn!("DHCP: Failed to send response");
        }
    }
}
