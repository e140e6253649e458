#![no_std]
#![no_main]

mod infrastructure;

use core::fmt::Write;

use embassy_executor::Spawner;
use embassy_time::Timer;
use heapless::String;
use log::{debug, info};

use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::{clock::CpuClock, timer::timg::TimerGroup};

use myrtio_sensor_core::app::{SENSOR_PERIOD, publish_reading};
use myrtio_sensor_core::{EventController, LedIndicator, Sampler};

use crate::infrastructure::adapters::{LinkRequester, MessagingAdapter, OutboxPublisher};
use crate::infrastructure::config::{self, CLIENT_ID_PREFIX, hardware_id, load_device_config};
use crate::infrastructure::drivers::{EspLedStrip, HardwareRng, init_network_stack};
use crate::infrastructure::tasks::{
    address_watch_task, controller_task, mqtt_session_task, network_runner_task,
    wifi_connection_task,
};

esp_bootloader_esp_idf::esp_app_desc!();

fn format_client_id(hardware_id: u32) -> String<32> {
    let mut client_id = String::<32>::new();
    let _ = write!(client_id, "{}-{:04X}", CLIENT_ID_PREFIX, hardware_id & 0xFFFF);
    client_id
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    info!("MyrtIO sensor firmware {}", config::FIRMWARE.version);

    // Initialize hardware
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    esp_alloc::heap_allocator!(size: 72 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let software_interrupt = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, software_interrupt.software_interrupt0);

    let device_config = match load_device_config() {
        Ok(device_config) => device_config,
        Err(e) => panic!("config: {}", e),
    };
    info!(
        "config: broker {}:{}, reconnect {:?}",
        device_config.broker.host, device_config.broker.port, device_config.reconnect
    );

    // The indicator starts dark until the first control message
    let strip = match EspLedStrip::new(peripherals.RMT, crate::led_gpio!(peripherals)) {
        Ok(strip) => strip,
        Err(e) => panic!("led: {}", e),
    };
    let mut led = LedIndicator::new(strip);
    if let Err(e) = led.clear() {
        panic!("led: failed to clear: {}", e);
    }
    info!("led: driver ready");

    // Initialize network stack and spawn network tasks
    let network = init_network_stack(peripherals.WIFI);
    let client_id = crate::mk_static!(String<32>, format_client_id(hardware_id()));

    let controller = EventController::new(
        device_config.clone(),
        led,
        LinkRequester,
        MessagingAdapter::default(),
    );
    spawner.spawn(controller_task(controller)).ok();
    spawner.spawn(network_runner_task(network.runner)).ok();
    spawner.spawn(address_watch_task(network.stack)).ok();
    spawner
        .spawn(mqtt_session_task(network.stack, client_id.as_str()))
        .ok();
    spawner
        .spawn(wifi_connection_task(network.controller, device_config.wifi))
        .ok();

    // Sensor loop
    let mut sampler = Sampler::new(HardwareRng::new());
    let mut publisher = OutboxPublisher;
    loop {
        let reading = sampler.sample();
        let report = publish_reading(&mut publisher, &reading);
        info!(
            "sensor: Temp: {} | Humidity: {} | Light: {}",
            reading.temperature, reading.humidity, reading.light
        );
        debug!(
            "sensor: {} published, {} dropped",
            report.published, report.dropped
        );
        Timer::after(SENSOR_PERIOD).await;
    }
}
