#![allow(dead_code)]

use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[ctor::ctor]
fn init_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

pub const BULLET: char = '\u{15}';

/// Inline time bullet as written by CLAN.
pub fn bullet(start: u64, end: u64) -> String {
    format!("{BULLET}{start}_{end}{BULLET}")
}

/// A short Spanish home recording: mother and father talking to the child
/// and to each other.
pub fn home_recording() -> String {
    [
        "@UTF8".to_string(),
        "@Begin".to_string(),
        "@Languages:\tspa".to_string(),
        "@Participants:\tCHI Target_Child, MOT Mother, FAT Father".to_string(),
        "@ID:\tspa|corpus|CHI|2;03.|female|||Target_Child|||".to_string(),
        format!("*MOT:\ttenés que comer [+ CHI] . {}", bullet(0, 1200)),
        "%mor:\taux|tene-2S lk|que v|come-INF .".to_string(),
        "%pra:\t$DAV".to_string(),
        format!("*CHI:\tno . {}", bullet(1300, 1600)),
        "%mor:\tco|no .".to_string(),
        format!("*MOT:\tdale , comé [+ CHI] . {}", bullet(1700, 2500)),
        "%mor:\timp|da-2S&IMP~pro:clit|3S cm|cm v|come-2S&IMP .".to_string(),
        format!("*SIL:\t0 . {}", bullet(2500, 9000)),
        format!("*FAT:\tla nena está cansada . {}", bullet(9000, 10500)),
        "%mor:\tdet:art|la n|nena cop|esta-3S part|cansa-PP&FEM .".to_string(),
        "%dad:\t$COM:JUO".to_string(),
        format!("*MOT:\tsí , ya se va a dormir . {}", bullet(10600, 12000)),
        "%mor:\tco|sí cm|cm adv|ya pro:refl|se v|i-3S prep|a inf|dormi .".to_string(),
        "%dad:\t$CAB".to_string(),
        format!("*MOT:\tmirá papi [+ CHI] . {}", bullet(18000, 19000)),
        "%mor:\tv|mira-2S&IMP n:prop|papi .".to_string(),
        "%com:\tpoints to the door".to_string(),
        "@End".to_string(),
    ]
    .join("\n")
}
