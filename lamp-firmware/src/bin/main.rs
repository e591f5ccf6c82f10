// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

use core::cell::RefCell;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_net::{Config as NetConfig, Ipv4Address, Ipv4Cidr, Stack, StackResources,
    StaticConfigV4};
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Timer, WithTimeout};

use defmt::{Debug2Format, error, info, warn};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use esp_hal_smartled::smart_led_buffer;
use esp_radio::wifi::WifiController;
use esp_storage::FlashStorage;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use lamp_core::LampController;

// Projekt-Module und Konfiguration
use smart_lamp::config::{
    CONNECT_TIMEOUT_SECS, EXTRA_HEAP_SIZE, LED_COUNT, PORTAL_TIMEOUT_SECS, RESTART_DELAY_SECS,
    RMT_CLOCK_MHZ, SETUP_AP_ADDRESS, SETUP_AP_PREFIX_LEN, SETUP_AP_SSID, WIFI_HEAP_SIZE,
};
use smart_lamp::hal::{RmtStripWriter, STRIP_BUFFER_SIZE};
use smart_lamp::provisioning::{
    self, CREDENTIALS_SAVED, Credentials, access_point_config, dhcp_server_task, portal_http_task,
};
use smart_lamp::tasks::wifi::client_config;
use smart_lamp::tasks::{connection_task, http_server_task, net_task, wait_for_ip};
use smart_lamp::{SharedFlash, SharedLamp};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware und WiFi, entscheidet dann anhand der
/// gespeicherten Credentials zwischen Normalbetrieb (Station + Lampen-API)
/// und Setup-Portal. Scheitert das Provisioning, wird geloggt und nach
/// kurzer Wartezeit neu gestartet.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi controller"));

    let (mut wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Random seeds für die TCP/IP Stacks (von Hardware RNG)
    let rng = Rng::new();
    let sta_seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let ap_seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Zwei Netzwerk-Stacks: Station für den Normalbetrieb, Access Point
    // für das Setup-Portal. Gespawnt wird immer nur, was der jeweilige
    // Boot-Pfad braucht.
    static STA_RESOURCES: static_cell::StaticCell<StackResources<4>> =
        static_cell::StaticCell::new();
    let (sta_stack, sta_runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        STA_RESOURCES.init(StackResources::new()),
        sta_seed,
    );

    let ap_address = Ipv4Address::from(SETUP_AP_ADDRESS);
    static AP_RESOURCES: static_cell::StaticCell<StackResources<4>> =
        static_cell::StaticCell::new();
    let (ap_stack, ap_runner) = embassy_net::new(
        wifi_interface.ap,
        NetConfig::ipv4_static(StaticConfigV4 {
            address: Ipv4Cidr::new(ap_address, SETUP_AP_PREFIX_LEN),
            gateway: Some(ap_address),
            dns_servers: Default::default(),
        }),
        AP_RESOURCES.init(StackResources::new()),
        ap_seed,
    );

    // Stacks müssen 'static sein für Tasks
    static STA_STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let sta_stack = &*STA_STACK.init(sta_stack);
    static AP_STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let ap_stack = &*AP_STACK.init(ap_stack);

    // Flash öffnen und gespeicherte Credentials laden
    static FLASH: static_cell::StaticCell<SharedFlash> = static_cell::StaticCell::new();
    let flash = &*FLASH.init(Mutex::new(RefCell::new(FlashStorage::new(
        peripherals.FLASH,
    ))));
    let saved = flash.lock(|cell| provisioning::store::load(&mut cell.borrow_mut()));

    if let Some(credentials) = saved {
        info!(
            "Boot: found saved credentials for '{}'",
            credentials.ssid.as_str()
        );

        spawner.spawn(net_task(sta_runner)).unwrap();

        if try_join_network(&mut wifi_controller, sta_stack, &credentials).await {
            // ---- Normalbetrieb: Lampen-API ----

            // Reconnect-Wächter übernimmt den Controller
            spawner
                .spawn(connection_task(wifi_controller, credentials))
                .unwrap();

            // LED-Strip initialisieren (Buffer für 30 LEDs, siehe LED_COUNT)
            static RMT_BUFFER: static_cell::StaticCell<
                [esp_hal::rmt::PulseCode; STRIP_BUFFER_SIZE],
            > = static_cell::StaticCell::new();
            let rmt_buffer = RMT_BUFFER.init(smart_led_buffer!(30));
            let strip = RmtStripWriter::new(
                peripherals.GPIO8,
                peripherals.RMT,
                RMT_CLOCK_MHZ,
                rmt_buffer,
            );

            // Controller im Boot-Zustand (aus) hinter dem geteilten Mutex
            static LAMP: static_cell::StaticCell<SharedLamp> = static_cell::StaticCell::new();
            let lamp = &*LAMP.init(Mutex::new(RefCell::new(LampController::new(strip))));

            spawner.spawn(http_server_task(sta_stack, lamp)).unwrap();

            // Erster Frame: Boot-Zustand auf die Hardware schreiben
            lamp.lock(|cell| {
                if cell.borrow_mut().refresh().is_err() {
                    error!("LED: initial strip write failed");
                }
            });

            info!("Boot: lamp ready, {} LEDs", LED_COUNT);

            // Main-Loop: schläft (alle Arbeit läuft in Tasks)
            loop {
                Timer::after(Duration::from_secs(3600)).await;
            }
        }

        warn!(
            "Boot: no network lease within {}s, starting setup portal",
            CONNECT_TIMEOUT_SECS
        );
        wifi_controller.stop_async().await.ok();
    } else {
        info!("Boot: no saved credentials, starting setup portal");
    }

    // ---- Setup-Portal ----

    if let Err(e) = wifi_controller.set_config(&access_point_config()) {
        error!("Portal: failed to configure AP: {}", Debug2Format(&e));
        restart().await;
    }
    if let Err(e) = wifi_controller.start_async().await {
        error!("Portal: failed to start AP: {}", Debug2Format(&e));
        restart().await;
    }

    info!(
        "Portal: AP '{}' up, page at http://{}/",
        SETUP_AP_SSID,
        Debug2Format(&ap_address)
    );

    spawner.spawn(net_task(ap_runner)).unwrap();
    spawner.spawn(dhcp_server_task(ap_stack)).unwrap();
    spawner.spawn(portal_http_task(ap_stack, flash)).unwrap();

    // Warten bis Credentials gespeichert wurden oder das Fenster abläuft,
    // danach in beiden Fällen Neustart (Recovery via Reboot)
    match select(
        CREDENTIALS_SAVED.wait(),
        Timer::after(Duration::from_secs(PORTAL_TIMEOUT_SECS)),
    )
    .await
    {
        Either::First(()) => info!("Portal: credentials saved, restarting into station mode"),
        Either::Second(()) => error!(
            "Portal: no credentials received within {}s, restarting",
            PORTAL_TIMEOUT_SECS
        ),
    }

    restart().await
}

/// Erster Verbindungsversuch mit Zeitfenster
///
/// Verbindet mit dem gespeicherten Netz und wartet auf den DHCPv4-Lease.
/// `false` wenn das Zeitfenster abläuft - der Aufrufer startet dann das
/// Setup-Portal.
async fn try_join_network(
    controller: &mut WifiController<'static>,
    stack: &Stack<'static>,
    credentials: &Credentials,
) -> bool {
    if let Err(e) = controller.set_config(&client_config(credentials)) {
        error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
        return false;
    }
    if let Err(e) = controller.start_async().await {
        error!("WiFi: Failed to start: {}", Debug2Format(&e));
        return false;
    }

    let join = async {
        loop {
            info!("WiFi: Connecting to '{}'...", credentials.ssid.as_str());
            match controller.connect_async().await {
                Ok(()) => break,
                Err(e) => {
                    error!("WiFi: Connection failed: {}", Debug2Format(&e));
                    Timer::after(Duration::from_secs(2)).await;
                }
            }
        }
        wait_for_ip(stack).await;
    };

    join.with_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .await
        .is_ok()
}

/// Beendet den Boot-Versuch: kurze Wartezeit, dann Software-Reset
///
/// Der Reset ist die einzige Retry-Mechanik - es gibt bewusst keine
/// in-process Retry-Policy.
async fn restart() -> ! {
    Timer::after(Duration::from_secs(RESTART_DELAY_SECS)).await;
    esp_hal::system::software_reset()
}
