use super::Economy;

/// Mood split of the working citizens. Specialists are never counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Citizens {
    pub happy: u32,
    pub content: u32,
    pub unhappy: u32,
}

/// The two mood facts the governor cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mood {
    pub disorder: bool,
    pub happy: bool,
}

/// Workers up to `content_base` start content, the rest unhappy. Luxury is
/// then spent: content to happy first, then unhappy straight to happy at
/// double cost, then a last unhappy to content if anything is left.
pub fn distribute(workers: u32, luxury: i32, eco: &Economy) -> Citizens {
    let cost = eco.happy_cost.max(1);
    let mut lux = luxury.max(0);

    let mut content = workers.min(eco.content_base);
    let mut unhappy = workers - content;
    let mut happy = 0;

    while lux >= cost && content > 0 {
        content -= 1;
        happy += 1;
        lux -= cost;
    }
    while lux >= 2 * cost && unhappy > 0 {
        unhappy -= 1;
        happy += 1;
        lux -= 2 * cost;
    }
    if lux >= cost && unhappy > 0 {
        unhappy -= 1;
        content += 1;
    }

    Citizens {
        happy,
        content,
        unhappy,
    }
}

pub fn assess(size: u32, workers: u32, luxury: i32, eco: &Economy) -> Mood {
    let c = distribute(workers, luxury, eco);
    Mood {
        disorder: c.unhappy > c.happy,
        happy: size >= eco.celebrate_size && c.happy >= size.div_ceil(2) && c.unhappy == 0,
    }
}
