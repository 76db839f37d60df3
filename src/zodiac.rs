//! Chinese zodiac catalog and year resolution.
//!
//! The catalog is a fixed 12-entry table indexed by position in the yearly
//! animal cycle. Index 0 (Rato) falls on every year `y` with `(y - 4) % 12 == 0`,
//! e.g. 1924, 1984, 2020.

use serde::Serialize;

/// Number of signs in the cycle.
pub const SIGN_COUNT: usize = 12;

/// Angle covered by one wheel segment, in degrees.
pub const SEGMENT_ANGLE: f64 = 360.0 / SIGN_COUNT as f64;

/// Full turns the wheel makes before landing.
pub const FULL_SPINS: u32 = 5;

const CONDITION_80: &str = "(NOS PEDIDOS ACIMA DE R$80)";
const CONDITION_200: &str = "(NOS PEDIDOS ACIMA DE R$200)";

/// One animal of the cycle together with its fortune and coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZodiacSign {
    /// Position in the cycle, 0..=11.
    pub id: u8,
    /// Localized display name.
    pub name: &'static str,
    /// Localized fortune text.
    pub prediction: &'static str,
    /// Lookup key for the illustration.
    pub image_query: &'static str,
    /// Lookup key for the wheel icon.
    pub icon_query: &'static str,
    /// Discount code granted to this sign.
    pub coupon_code: &'static str,
    /// Qualifying purchase condition for the coupon.
    pub coupon_condition: &'static str,
}

pub static SIGNS: [ZodiacSign; SIGN_COUNT] = [
    ZodiacSign {
        id: 0,
        name: "Rato",
        prediction: "O Ano do Cavalo de Fogo acelera decisões e abre caminhos. Confie na sua inteligência, aja com estratégia e aproveite novas oportunidades que surgirem rapidamente.",
        image_query: "chinese zodiac rat elegant art",
        icon_query: "rat",
        coupon_code: "12OFF",
        coupon_condition: CONDITION_80,
    },
    ZodiacSign {
        id: 1,
        name: "Búfalo",
        prediction: "Este é um ano para sair da zona de conforto. O Cavalo de Fogo traz mudanças que exigem flexibilidade — quanto mais você se mover, mais prosperidade atrai.",
        image_query: "chinese zodiac ox buffalo elegant art",
        icon_query: "bull",
        coupon_code: "12OFF",
        coupon_condition: CONDITION_80,
    },
    ZodiacSign {
        id: 2,
        name: "Tigre",
        prediction: "Energia em alta! O Ano do Cavalo de Fogo favorece coragem, liderança e grandes conquistas. Confie no seu instinto e avance sem medo.",
        image_query: "chinese zodiac tiger elegant art",
        icon_query: "tiger",
        coupon_code: "30OFF",
        coupon_condition: CONDITION_200,
    },
    ZodiacSign {
        id: 3,
        name: "Coelho",
        prediction: "O Cavalo de Fogo pede mais atitude. Este é o momento de equilibrar sensibilidade com ação e transformar boas ideias em resultados reais.",
        image_query: "chinese zodiac rabbit elegant art",
        icon_query: "rabbit",
        coupon_code: "12OFF",
        coupon_condition: CONDITION_80,
    },
    ZodiacSign {
        id: 4,
        name: "Dragão",
        prediction: "Um ano poderoso para expansão e reconhecimento. O Cavalo de Fogo impulsiona sua força natural e favorece crescimento, sucesso e visibilidade.",
        image_query: "chinese zodiac dragon elegant art",
        icon_query: "dragon",
        coupon_code: "30OFF",
        coupon_condition: CONDITION_200,
    },
    ZodiacSign {
        id: 5,
        name: "Serpente",
        prediction: "Estratégia e sabedoria continuam sendo seus aliados. O Cavalo de Fogo traz movimento — planeje bem e aja no momento certo para prosperar.",
        image_query: "chinese zodiac snake elegant art",
        icon_query: "snake",
        coupon_code: "12OFF",
        coupon_condition: CONDITION_80,
    },
    ZodiacSign {
        id: 6,
        name: "Cavalo",
        prediction: "Seu ano chegou! O Cavalo de Fogo potencializa energia, liberdade e conquistas. Aproveite para liderar, ousar e seguir seu próprio ritmo.",
        image_query: "chinese zodiac horse elegant art",
        icon_query: "horse",
        coupon_code: "30OFF",
        coupon_condition: CONDITION_200,
    },
    ZodiacSign {
        id: 7,
        name: "Cabra",
        prediction: "Criatividade e sensibilidade ganham força. O Cavalo de Fogo convida você a confiar mais em si e transformar talento em novas oportunidades.",
        image_query: "chinese zodiac goat sheep elegant art",
        icon_query: "goat",
        coupon_code: "12OFF",
        coupon_condition: CONDITION_80,
    },
    ZodiacSign {
        id: 8,
        name: "Macaco",
        prediction: "Um ano dinâmico e cheio de possibilidades. O Cavalo de Fogo favorece inovação, inteligência e soluções rápidas — use sua criatividade a seu favor.",
        image_query: "chinese zodiac monkey elegant art",
        icon_query: "monkey",
        coupon_code: "30OFF",
        coupon_condition: CONDITION_200,
    },
    ZodiacSign {
        id: 9,
        name: "Galo",
        prediction: "Organização e foco serão essenciais. O Cavalo de Fogo traz movimento, mas recompensa quem mantém disciplina e clareza nos objetivos.",
        image_query: "chinese zodiac rooster chicken elegant art",
        icon_query: "rooster",
        coupon_code: "30OFF",
        coupon_condition: CONDITION_200,
    },
    ZodiacSign {
        id: 10,
        name: "Cachorro",
        prediction: "Relações ganham destaque. O Cavalo de Fogo favorece parcerias, confiança e lealdade — cuide dos vínculos e colha bons resultados.",
        image_query: "chinese zodiac dog elegant art",
        icon_query: "dog",
        coupon_code: "30OFF",
        coupon_condition: CONDITION_200,
    },
    ZodiacSign {
        id: 11,
        name: "Porco",
        prediction: "Um ano de recompensas e boas surpresas. O Cavalo de Fogo traz prosperidade, prazer e novas experiências — aproveite sem excessos.",
        image_query: "chinese zodiac pig elegant art",
        icon_query: "pig",
        coupon_code: "12OFF",
        coupon_condition: CONDITION_80,
    },
];

/// The whole catalog in cycle order.
pub fn signs() -> &'static [ZodiacSign] {
    &SIGNS
}

/// Looks up a sign by its cycle position.
pub fn by_id(id: u8) -> Option<&'static ZodiacSign> {
    SIGNS.get(id as usize)
}

/// Resolves the sign for a birth year.
///
/// Total over every `i32`: the remainder is taken in `i64` and normalised
/// with `rem_euclid`, so years before the anchor still land in `0..12`.
pub fn resolve(year: i32) -> &'static ZodiacSign {
    let index = (i64::from(year) - 4).rem_euclid(SIGN_COUNT as i64) as usize;
    &SIGNS[index]
}

/// Target rotation (degrees) for the wheel so the pointer stops on `target_id`.
///
/// The wheel first sheds its partial turn, then spins `FULL_SPINS` times and
/// backs off one segment per index. `%` keeps the sign of `current`, matching
/// how the frontend accumulates rotation.
pub fn spin_rotation(current: f64, target_id: u8) -> f64 {
    let base = 360.0 * f64::from(FULL_SPINS);
    let target = -(f64::from(target_id) * SEGMENT_ANGLE);
    current + base + target - (current % 360.0)
}
