use mastergrid_midi_io::MidiOutputManager;

fn main() {
    println!("=== MIDI Output Devices ===");
    let devices = MidiOutputManager::list_devices();
    if devices.is_empty() {
        println!("  (none found)");
    }
    for dev in &devices {
        println!("  [{}] {}", dev.index, dev.name);
    }
}
