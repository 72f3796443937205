/// Growth stage of the pet, driven by correct answers in the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PetStage {
    Egg,
    WobblingEgg,
    CrackedEgg,
    Hatchling,
    Fledgling,
    Grown,
}

impl PetStage {
    pub fn for_correct_count(correct: u32) -> Self {
        match correct {
            0 => PetStage::Egg,
            1 => PetStage::WobblingEgg,
            2 => PetStage::CrackedEgg,
            3 => PetStage::Hatchling,
            4 => PetStage::Fledgling,
            _ => PetStage::Grown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PetStage::Egg => "Egg",
            PetStage::WobblingEgg => "Wobbling egg",
            PetStage::CrackedEgg => "Cracked egg",
            PetStage::Hatchling => "Hatchling",
            PetStage::Fledgling => "Fledgling",
            PetStage::Grown => "Fully grown",
        }
    }

    pub fn art(self) -> &'static [&'static str] {
        match self {
            PetStage::Egg => &["  ___  ", " /   \\ ", "|     |", " \\___/ "],
            PetStage::WobblingEgg => &["  ___  ", " / ~ \\ ", "|  ~  |", " \\___/ "],
            PetStage::CrackedEgg => &["  _^_  ", " / / \\ ", "| /\\/ |", " \\___/ "],
            PetStage::Hatchling => &["  ^ ^  ", " (o.o) ", " /\\_/\\ ", " \\___/ "],
            PetStage::Fledgling => &["  ^ ^  ", " (o.o) ", " /| |\\ ", "  ^ ^  "],
            PetStage::Grown => &[" /\\_/\\ ", "( ^.^ )", " > ^ < ", "/|   |\\"],
        }
    }
}
