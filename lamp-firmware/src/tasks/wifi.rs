// WiFi Task - Verbindet mit WLAN und managed Connection
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{
    AuthMethod, ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent, WifiStaState,
};

use crate::provisioning::Credentials;

/// Baut die Station-Konfiguration aus den gespeicherten Credentials
///
/// Offene Netze (leeres Passwort) werden unterstützt.
pub fn client_config(credentials: &Credentials) -> ModeConfig {
    let config = if credentials.password.is_empty() {
        ClientConfig::default()
            .with_ssid(credentials.ssid.as_str().into())
            .with_auth_method(AuthMethod::None)
    } else {
        ClientConfig::default()
            .with_ssid(credentials.ssid.as_str().into())
            .with_password(credentials.password.as_str().into())
    };
    ModeConfig::Client(config)
}

/// WiFi Connection Task
///
/// Übernimmt den Controller nach dem ersten erfolgreichen Verbindungs-
/// versuch und managed die Verbindung danach:
/// - Wartet auf Disconnect-Events
/// - Reconnected mit den gespeicherten Credentials
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>, credentials: Credentials) {
    info!("WiFi: Starting connection task");

    loop {
        // Solange verbunden: auf Disconnect warten
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            warn!("WiFi: Disconnected from AP, will retry...");
            Timer::after(Duration::from_secs(2)).await;
        }

        if !matches!(controller.is_started(), Ok(true)) {
            info!("WiFi: Configuring and starting...");

            if let Err(e) = controller.set_config(&client_config(&credentials)) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(5)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(5)).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        // Connect to AP
        info!("WiFi: Connecting to '{}'...", credentials.ssid.as_str());
        match controller.connect_async().await {
            Ok(_) => {
                info!("WiFi: Connected successfully!");
            }
            Err(e) => {
                error!("WiFi: Connection failed: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(5)).await;
            }
        }
    }
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
///
/// Pool-Größe 2: eine Instanz für den Station-Stack, eine für den
/// Access-Point-Stack des Setup-Portals.
#[embassy_executor::task(pool_size = 2)]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Wartet bis eine IPv4-Adresse vom DHCP-Server erhalten wurde
/// und loggt dann die Netzwerk-Konfiguration
pub async fn wait_for_ip(stack: &Stack<'static>) {
    loop {
        if stack.is_link_up() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }

    info!("WiFi: Link is up, waiting for IP address...");

    loop {
        if let Some(config) = stack.config_v4() {
            info!("WiFi: Got IP address!");
            info!("  IP:      {}", Debug2Format(&config.address.address()));
            info!("  Gateway: {}", Debug2Format(&config.gateway));
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}
