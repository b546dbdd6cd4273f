use crate::settings::Language;

/// Localized strings keyed by string id, in ko/en/ja/zh order.
///
/// Lookup falls back to the id itself for unknown keys so a missing
/// translation renders as something readable instead of panicking.
pub fn translate(language: Language, key: &str) -> &str {
    let Some(entry) = lookup(key) else {
        return key;
    };

    match language {
        Language::Ko => entry[0],
        Language::En => entry[1],
        Language::Ja => entry[2],
        Language::Zh => entry[3],
    }
}

fn lookup(key: &str) -> Option<[&'static str; 4]> {
    let entry = match key {
        // Status
        "safe" => ["안전", "Safe", "安全", "安全"],
        "caution" => ["주의", "Caution", "注意", "注意"],
        "danger" => ["위험", "Danger", "危険", "危险"],

        // Status messages
        "safeMessage" => [
            "산책하기에 최적의 노면 온도입니다!",
            "The pavement temperature is perfect for walking!",
            "散歩に最適な路面温度です！",
            "路面温度适合散步！",
        ],
        "cautionMessage" => [
            "짧은 산책을 추천합니다",
            "Short walks are recommended",
            "短時間の散歩を推奨します",
            "推荐短时间散步",
        ],
        "dangerMessage" => [
            "여기서는 산책을 피해주세요!",
            "Please avoid walking here!",
            "ここでの散歩は避けてください！",
            "请避免在此散步！",
        ],

        // Measurements
        "surfaceTemp" => ["노면 온도", "Surface Temp", "路面温度", "路面温度"],
        "airTemp" => ["기온", "Air Temp", "気温", "气温"],
        "humidity" => ["습도", "Humidity", "湿度", "湿度"],
        "solarRadiation" => ["일사량", "Solar Radiation", "日射量", "太阳辐射"],

        // Connection status
        "connected" => ["연결됨", "Connected", "接続済み", "已连接"],
        "disconnected" => ["연결 끊김", "Disconnected", "切断", "已断开"],

        // Walk & history
        "walkStarted" => ["산책 시작", "Walk started", "散歩開始", "开始散步"],
        "walkEnded" => ["산책 종료", "Walk ended", "散歩終了", "结束散步"],
        "noWalksFound" => [
            "기록된 산책이 없습니다",
            "No walks recorded yet",
            "記録された散歩はありません",
            "还没有散步记录",
        ],
        "walkMemo" => ["산책 메모", "Walk memo", "散歩メモ", "散步备注"],
        "totalDuration" => ["총 시간", "Total duration", "合計時間", "总时长"],

        _ => return None,
    };

    Some(entry)
}
