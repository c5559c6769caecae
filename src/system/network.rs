//! Local addresses shown in access instructions
//!
//! Nothing here feeds a decision; a lookup failure falls back to `localhost`.

use std::net::{IpAddr, UdpSocket};

/// Public address used only to pick the outbound interface; no packet is sent
const PROBE_ADDR: &str = "8.8.8.8:80";

pub trait NetworkIdentity {
    /// Address remote users should connect to
    fn primary_address(&self) -> String;

    /// Every non-loopback IPv4 address of this host
    fn all_addresses(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HostNetwork;

impl NetworkIdentity for HostNetwork {
    fn primary_address(&self) -> String {
        match probe_outbound_ip() {
            Ok(ip) if !ip.is_loopback() && !ip.is_unspecified() => ip.to_string(),
            Ok(_) => "localhost".to_string(),
            Err(e) => {
                log::warn!("[Network] Error determining main IP: {e}. Using localhost");
                "localhost".to_string()
            }
        }
    }

    fn all_addresses(&self) -> Vec<String> {
        match if_addrs::get_if_addrs() {
            Ok(interfaces) => ipv4_addresses(interfaces.iter().map(if_addrs::Interface::ip)),
            Err(e) => {
                log::warn!("[Network] Could not list interfaces: {e}");
                Vec::new()
            }
        }
    }
}

fn probe_outbound_ip() -> std::io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0")?;
    socket.connect(PROBE_ADDR)?;
    Ok(socket.local_addr()?.ip())
}

fn ipv4_addresses(ips: impl Iterator<Item = IpAddr>) -> Vec<String> {
    let mut addresses: Vec<String> = ips
        .filter(|ip| ip.is_ipv4() && !ip.is_loopback())
        .map(|ip| ip.to_string())
        .collect();
    addresses.sort();
    addresses.dedup();
    addresses
}
