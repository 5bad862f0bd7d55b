//! BLE status notifier.
//!
//! Implements [`NotifierPort`]: a GATT server with one readable, notifiable
//! string characteristic carrying the latest readings.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid GATT server via raw `esp_idf_svc::sys` calls.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## GATT Service Layout
//!
//! | Characteristic | UUID                                   | Props       |
//! |----------------|----------------------------------------|-------------|
//! | Status         | `beb5483e-36e1-4688-b7f5-ea07361b26a8` | Read+Notify |
//!
//! under service `4fafc201-1fb5-459e-8fcc-c5c9c331914b`.

use log::{info, warn};

use crate::app::format::PAYLOAD_CAPACITY;
use crate::app::ports::NotifierPort;
use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

pub const SERVICE_UUID: u128 = 0x4fafc201_1fb5_459e_8fcc_c5c9c331914b;
pub const CHAR_STATUS: u128 = 0xbeb5483e_36e1_4688_b7f5_ea07361b26a8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleState {
    Idle,
    Advertising,
    Connected,
}

// ── ESP-IDF BLE static state (ISR-safe atomics) ───────────────
//
// Bluedroid callbacks are C function pointers that cannot capture Rust
// closures. These atomics bridge the callback context to the adapter.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering as AtomicOrdering};

#[cfg(target_os = "espidf")]
static BLE_GATTS_IF: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_CONN_ID: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_CONNECTED: AtomicBool = AtomicBool::new(false);
/// Bumped on every connect so `poll()` notices a central that came and
/// went between two polls.
#[cfg(target_os = "espidf")]
static BLE_CONNECTIONS: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_STATUS_CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);

#[cfg(target_os = "espidf")]
fn uuid128_to_esp(uuid: u128) -> esp_idf_svc::sys::esp_bt_uuid_t {
    let mut t: esp_idf_svc::sys::esp_bt_uuid_t = unsafe { core::mem::zeroed() };
    t.len = 16;
    unsafe {
        t.uuid.uuid128 = uuid.to_le_bytes();
    }
    t
}

#[cfg(target_os = "espidf")]
fn adv_params() -> esp_idf_svc::sys::esp_ble_adv_params_t {
    use esp_idf_svc::sys::*;
    esp_ble_adv_params_t {
        adv_int_min: 0x20,
        adv_int_max: 0x40,
        adv_type: esp_ble_adv_type_t_ADV_TYPE_IND,
        own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
        channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
        adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
        ..unsafe { core::mem::zeroed() }
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gap_event_handler(
    event: esp_idf_svc::sys::esp_gap_ble_cb_event_t,
    _param: *mut esp_idf_svc::sys::esp_ble_gap_cb_param_t,
) {
    use esp_idf_svc::sys::*;
    match event {
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_DATA_SET_COMPLETE_EVT => {
            let mut params = adv_params();
            unsafe { esp_ble_gap_start_advertising(&mut params) };
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising started");
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_STOP_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising stopped");
        }
        _ => {}
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gatts_event_handler(
    event: esp_idf_svc::sys::esp_gatts_cb_event_t,
    gatts_if: esp_idf_svc::sys::esp_gatt_if_t,
    param: *mut esp_idf_svc::sys::esp_ble_gatts_cb_param_t,
) {
    use esp_idf_svc::sys::*;

    BLE_GATTS_IF.store(gatts_if as u32, AtomicOrdering::Relaxed);

    match event {
        esp_gatts_cb_event_t_ESP_GATTS_REG_EVT => {
            log::info!("BLE GATTS: app registered (if={})", gatts_if);
            let mut svc_id = esp_gatt_srvc_id_t {
                id: esp_gatt_id_t {
                    uuid: uuid128_to_esp(SERVICE_UUID),
                    inst_id: 0,
                },
                is_primary: true,
            };
            // service + characteristic declaration + value + CCCD
            unsafe { esp_ble_gatts_create_service(gatts_if, &mut svc_id, 4) };
        }
        esp_gatts_cb_event_t_ESP_GATTS_CREATE_EVT => {
            let svc_handle = unsafe { (*param).create.service_handle };
            log::info!("BLE GATTS: service created (handle={})", svc_handle);
            unsafe { esp_ble_gatts_start_service(svc_handle) };

            let mut char_uuid = uuid128_to_esp(CHAR_STATUS);
            let mut initial = [0u8; PAYLOAD_CAPACITY];
            let mut value = esp_attr_value_t {
                attr_max_len: PAYLOAD_CAPACITY as u16,
                attr_len: 0,
                attr_value: initial.as_mut_ptr(),
            };
            // The stack answers reads from its own copy of the value.
            let mut control = esp_attr_control_t {
                auto_rsp: ESP_GATT_AUTO_RSP as u8,
            };
            unsafe {
                esp_ble_gatts_add_char(
                    svc_handle,
                    &mut char_uuid,
                    ESP_GATT_PERM_READ as esp_gatt_perm_t,
                    (ESP_GATT_CHAR_PROP_BIT_READ | ESP_GATT_CHAR_PROP_BIT_NOTIFY)
                        as esp_gatt_char_prop_t,
                    &mut value,
                    &mut control,
                )
            };
        }
        esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_EVT => {
            let p = unsafe { &(*param).add_char };
            BLE_STATUS_CHAR_HANDLE.store(p.attr_handle as u32, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: status char (handle={})", p.attr_handle);

            let mut cccd: esp_bt_uuid_t = unsafe { core::mem::zeroed() };
            cccd.len = 2;
            cccd.uuid.uuid16 = ESP_GATT_UUID_CHAR_CLIENT_CONFIG as u16;
            unsafe {
                esp_ble_gatts_add_char_descr(
                    p.service_handle,
                    &mut cccd,
                    (ESP_GATT_PERM_READ | ESP_GATT_PERM_WRITE) as esp_gatt_perm_t,
                    core::ptr::null_mut(),
                    core::ptr::null_mut(),
                )
            };
        }
        esp_gatts_cb_event_t_ESP_GATTS_CONNECT_EVT => {
            let p = unsafe { &(*param).connect };
            BLE_CONN_ID.store(p.conn_id as u32, AtomicOrdering::Relaxed);
            BLE_CONNECTED.store(true, AtomicOrdering::Release);
            BLE_CONNECTIONS.fetch_add(1, AtomicOrdering::AcqRel);
            log::info!("BLE GATTS: client connected (conn_id={})", p.conn_id);
        }
        esp_gatts_cb_event_t_ESP_GATTS_DISCONNECT_EVT => {
            BLE_CONNECTED.store(false, AtomicOrdering::Release);
            log::info!("BLE GATTS: client disconnected");
        }
        _ => {}
    }
}

pub struct BleNotifier {
    state: BleState,
    device_name: heapless::String<24>,
    status: heapless::String<PAYLOAD_CAPACITY>,
    notifications: u32,
    readvertisements: u32,
    /// Connection count as of the last `poll()`.
    seen_connections: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_connected: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_connections: u32,
}

impl BleNotifier {
    pub fn new(device_name: heapless::String<24>) -> Self {
        Self {
            state: BleState::Idle,
            device_name,
            status: heapless::String::new(),
            notifications: 0,
            readvertisements: 0,
            seen_connections: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_connected: false,
            #[cfg(not(target_os = "espidf"))]
            sim_connections: 0,
        }
    }

    pub fn state(&self) -> BleState {
        self.state
    }

    /// Value a central would read right now.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn notifications_sent(&self) -> u32 {
        self.notifications
    }

    pub fn readvertisements(&self) -> u32 {
        self.readvertisements
    }

    /// Bring up the controller and GATT server and start advertising.
    pub fn start(&mut self) -> Result<(), CommsError> {
        info!("BLE: starting advertising as '{}'", self.device_name);
        self.platform_start()?;
        self.state = BleState::Advertising;
        Ok(())
    }

    /// Simulate a central (dis)connecting. Picked up on the next `poll()`.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_connected(&mut self, connected: bool) {
        if connected && !self.sim_connected {
            self.sim_connections = self.sim_connections.wrapping_add(1);
        }
        self.sim_connected = connected;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn central_connected(&self) -> bool {
        BLE_CONNECTED.load(AtomicOrdering::Acquire)
    }

    #[cfg(not(target_os = "espidf"))]
    fn central_connected(&self) -> bool {
        self.sim_connected
    }

    #[cfg(target_os = "espidf")]
    fn connection_count(&self) -> u32 {
        BLE_CONNECTIONS.load(AtomicOrdering::Acquire)
    }

    #[cfg(not(target_os = "espidf"))]
    fn connection_count(&self) -> u32 {
        self.sim_connections
    }

    fn readvertise(&mut self) {
        self.platform_restart_advertising();
        self.readvertisements += 1;
        self.state = BleState::Advertising;
    }

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::sys::*;

        fn check(step: &str, rc: i32) -> Result<(), CommsError> {
            if rc == ESP_OK as i32 {
                Ok(())
            } else {
                log::error!("BLE: {} failed ({})", step, rc);
                Err(CommsError::BleInitFailed(rc))
            }
        }

        unsafe {
            // Release classic BT memory (BLE-only mode saves ~30 KB).
            esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT);

            let mut bt_cfg = esp_bt_controller_config_t::default();
            check("bt_controller_init", esp_bt_controller_init(&mut bt_cfg))?;
            check(
                "bt_controller_enable",
                esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE),
            )?;
            check("bluedroid_init", esp_bluedroid_init())?;
            check("bluedroid_enable", esp_bluedroid_enable())?;

            check(
                "gap_register_callback",
                esp_ble_gap_register_callback(Some(ble_gap_event_handler)),
            )?;
            check(
                "gatts_register_callback",
                esp_ble_gatts_register_callback(Some(ble_gatts_event_handler)),
            )?;
            check("gatts_app_register", esp_ble_gatts_app_register(0))?;

            // Bluedroid wants a NUL-terminated name.
            let mut name: heapless::Vec<u8, 25> = heapless::Vec::new();
            let _ = name.extend_from_slice(self.device_name.as_bytes());
            let _ = name.push(0);
            check(
                "gap_set_device_name",
                esp_ble_gap_set_device_name(name.as_ptr() as *const _),
            )?;

            // Advertising starts from the GAP callback once the data is set.
            let mut adv_data = esp_ble_adv_data_t {
                set_scan_rsp: false,
                include_name: true,
                include_txpower: false,
                flag: (ESP_BLE_ADV_FLAG_GEN_DISC | ESP_BLE_ADV_FLAG_BREDR_NOT_SPT) as u8,
                ..core::mem::zeroed()
            };
            check("gap_config_adv_data", esp_ble_gap_config_adv_data(&mut adv_data))?;
        }

        info!(
            "BLE(espidf): Bluedroid stack initialized, advertising as '{}'",
            self.device_name
        );
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> Result<(), CommsError> {
        info!(
            "BLE(sim): advertising '{}' (service {:032x})",
            self.device_name, SERVICE_UUID
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_restart_advertising(&mut self) {
        let mut params = adv_params();
        let rc = unsafe { esp_idf_svc::sys::esp_ble_gap_start_advertising(&mut params) };
        if rc != esp_idf_svc::sys::ESP_OK as i32 {
            warn!("BLE: restart advertising failed ({})", rc);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_restart_advertising(&mut self) {
        info!("BLE(sim): advertising restarted");
    }

    #[cfg(target_os = "espidf")]
    fn platform_set_value(&mut self) {
        let handle = BLE_STATUS_CHAR_HANDLE.load(AtomicOrdering::Relaxed);
        if handle == 0 {
            return;
        }
        unsafe {
            esp_idf_svc::sys::esp_ble_gatts_set_attr_value(
                handle as u16,
                self.status.len() as u16,
                self.status.as_ptr(),
            );
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_set_value(&mut self) {}

    #[cfg(target_os = "espidf")]
    fn platform_notify(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::sys::*;
        let handle = BLE_STATUS_CHAR_HANDLE.load(AtomicOrdering::Relaxed);
        if handle == 0 {
            return Err(CommsError::NotifyFailed);
        }
        let rc = unsafe {
            esp_ble_gatts_send_indicate(
                BLE_GATTS_IF.load(AtomicOrdering::Relaxed) as esp_gatt_if_t,
                BLE_CONN_ID.load(AtomicOrdering::Relaxed) as u16,
                handle as u16,
                self.status.len() as u16,
                self.status.as_ptr() as *mut u8,
                false,
            )
        };
        if rc == ESP_OK as i32 {
            Ok(())
        } else {
            Err(CommsError::NotifyFailed)
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_notify(&mut self) -> Result<(), CommsError> {
        log::debug!("BLE(sim): notify {}", self.status);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// NotifierPort implementation
// ───────────────────────────────────────────────────────────────

impl NotifierPort for BleNotifier {
    fn poll(&mut self) {
        if self.state == BleState::Idle {
            return;
        }
        let connected = self.central_connected();
        let connections = self.connection_count();
        let missed = connections != self.seen_connections;
        self.seen_connections = connections;

        match (self.state, connected) {
            (BleState::Advertising, true) => {
                info!("BLE: central connected");
                self.state = BleState::Connected;
            }
            (BleState::Connected, false) => {
                info!("BLE: central disconnected, advertising again");
                self.readvertise();
            }
            // Connecting stopped advertising even though the central is
            // already gone.
            (BleState::Advertising, false) if missed => {
                info!("BLE: central connected and left between polls, advertising again");
                self.readvertise();
            }
            _ => {}
        }
    }

    fn publish(&mut self, payload: &str) -> Result<(), CommsError> {
        self.status.clear();
        if self.status.push_str(payload).is_err() {
            warn!(
                "BLE: status payload truncated ({} > {})",
                payload.len(),
                PAYLOAD_CAPACITY
            );
            for ch in payload.chars() {
                if self.status.push(ch).is_err() {
                    break;
                }
            }
        }

        if self.state == BleState::Idle {
            return Ok(());
        }
        self.platform_set_value();

        if self.state != BleState::Connected {
            return Ok(());
        }
        self.platform_notify()?;
        self.notifications += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state == BleState::Connected
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
