use minifb::Key;

/// Host keyboard to Chip-8 hex keypad
///
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  <-  |Q|W|E|R|
/// |7|8|9|E|  <-  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
struct Keymap;

impl Keymap {
    pub fn from_key(key: &Key) -> Option<u8> {
        let cpu_index = match key {
            Key::Key1 => 0x1,
            Key::Key2 => 0x2,
            Key::Key3 => 0x3,
            Key::Key4 => 0xC,
            Key::Q => 0x4,
            Key::W => 0x5,
            Key::E => 0x6,
            Key::R => 0xD,
            Key::A => 0x7,
            Key::S => 0x8,
            Key::D => 0x9,
            Key::F => 0xE,
            Key::Z => 0xA,
            Key::X => 0x0,
            Key::C => 0xB,
            Key::V => 0xF,
            _ => return None,
        };

        Some(cpu_index)
    }
}

/// Pressed state of keys 0x0-0xF, indexed by key value
pub type KeyState = [bool; Keypad::NUM];

#[derive(Debug, Default)]
pub struct Keypad {
    state: KeyState,
}

impl Keypad {
    pub const NUM: usize = 16;

    /// Only the low nibble selects a key
    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.state[(key & 0xF) as usize]
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.state[(key & 0xF) as usize] = pressed;
    }

    pub fn snapshot(&self) -> KeyState {
        self.state
    }

    /// Lowest key that is held now but was not held in `previous`
    pub fn first_new_press(&self, previous: &KeyState) -> Option<u8> {
        (0..Self::NUM)
            .find(|&key| self.state[key] && !previous[key])
            .map(|key| key as u8)
    }

    /// Fills key state from window key state
    pub fn update_state(&mut self, keys: Vec<Key>) {
        self.state.fill(false);

        keys.iter().filter_map(Keymap::from_key).for_each(|key| {
            self.state[key as usize] = true;
        });
    }
}
