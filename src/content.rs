//! Pre-authored copy for the demo.
//!
//! Nothing here is derived from user input or model output; the sequencer only
//! echoes the submitted query next to it.

pub const WELCOME_MESSAGE: &str = "こんにちは！何かお手伝いできることはありますか？";
pub const OPENING_MESSAGE: &str = "私たちで日本を変えるビジネスを共創しましょう！";
pub const GREETING_POPUP: &str = "　私たちで日本を変えるビジネスを共創しましょう！";
pub const DEFAULT_CHAT_TITLE: &str = "新しいチャット";

pub const ERROR_INVALID_MESSAGES: &str = "無効なメッセージ形式です";
pub const ERROR_CHAT_FAILED: &str = "リクエストの処理中にエラーが発生しました";
pub const ERROR_QUERY_REQUIRED: &str = "クエリが必要です";
pub const ERROR_RESEARCH_FAILED: &str = "市場調査の処理中にエラーが発生しました";
pub const ERROR_REQUEST_FAILED: &str = "APIリクエストに失敗しました";
pub const ERROR_UNKNOWN: &str = "未知のエラーが発生しました";
pub const ERROR_INVALID_SELECTION: &str = "有効な選択ではありません。";
pub const MISSING_API_KEY_NOTICE: &str = "APIキーが設定されていないため、AIアシスタントは応答できません。環境変数にOPENAI_API_KEYを設定してください。";

pub struct BusinessPlan {
    pub name: &'static str,
    pub tagline: &'static str,
    pub highlights: &'static [&'static str],
}

pub const BUSINESS_PLAN: BusinessPlan = BusinessPlan {
    name: "CancerBridge",
    tagline: "AI画像診断で地域間のがん医療格差をなくす",
    highlights: &[
        "地方病院向けAI病理・画像診断支援SaaS",
        "遠隔読影ネットワークによる専門医リソースの共有",
        "ソフトバンク経済圏の通信・決済基盤を活用した導入支援",
        "診断データの構造化によるナレッジ蓄積と継続学習",
    ],
};

pub struct AgentPanel {
    pub name: &'static str,
    pub role: &'static str,
    pub finding: &'static str,
}

pub static MARKET_AGENTS: [AgentPanel; 4] = [
    AgentPanel {
        name: "Market Size Agent",
        role: "市場規模",
        finding: "国内のAI画像診断市場は2023年時点で約420億円、年平均成長率は18%と推計されます。特に病理診断領域は専門医不足を背景に需要が急拡大しており、2030年には1,500億円規模に達する見込みです。",
    },
    AgentPanel {
        name: "Competitor Agent",
        role: "競合分析",
        finding: "主要競合は大手医療機器メーカー3社と国内スタートアップ5社。既存製品は都市部の大病院向けの高価格帯に集中しており、地方の中小病院向けに遠隔読影と一体化したサービスを提供するプレイヤーは存在しません。",
    },
    AgentPanel {
        name: "Opportunity Agent",
        role: "機会",
        finding: "地方自治体の医療DX補助金、オンライン診療の規制緩和、5G網の全国展開が追い風です。通信キャリアの法人顧客基盤を通じた一括導入により、初期3年間で400施設への展開が見込めます。",
    },
    AgentPanel {
        name: "Risk Agent",
        role: "課題",
        finding: "薬機法上のプログラム医療機器承認、診断責任の所在、医療データの越境移転規制が主要リスクです。承認取得までの期間を見据えた段階的な上市計画と、賠償責任保険の設計が不可欠です。",
    },
];

pub struct Patent {
    pub number: &'static str,
    pub title: &'static str,
    pub holder: &'static str,
    pub summary: &'static str,
}

pub static PATENTS: [Patent; 5] = [
    Patent {
        number: "特許第7012345号",
        title: "病理画像の腫瘍領域自動抽出方法",
        holder: "国立がん研究センター",
        summary: "深層学習により病理スライドから腫瘍領域をピクセル単位で抽出する。",
    },
    Patent {
        number: "特許第6987654号",
        title: "遠隔読影における画像圧縮伝送システム",
        holder: "ソフトバンク株式会社",
        summary: "診断品質を保ったまま医用画像を低帯域で伝送する。",
    },
    Patent {
        number: "特許第7123456号",
        title: "診断支援AIの説明可能性提示装置",
        holder: "東京大学",
        summary: "AIの判断根拠をヒートマップと所見文で医師に提示する。",
    },
    Patent {
        number: "特許第7054321号",
        title: "多施設データの連合学習方法",
        holder: "京都大学",
        summary: "患者データを施設外に出さずにモデルを共同学習する。",
    },
    Patent {
        number: "特許第6912345号",
        title: "検診結果に基づくリスク層別化システム",
        holder: "大阪大学",
        summary: "検診履歴から精密検査の優先度を自動で算出する。",
    },
];

pub struct Person {
    pub name: &'static str,
    pub title: &'static str,
    pub expertise: &'static str,
}

pub struct Roster {
    pub label: &'static str,
    pub members: &'static [Person],
}

pub static TALENT_ROSTERS: [Roster; 2] = [
    Roster {
        label: "社内リーダー候補",
        members: &[
            Person {
                name: "佐藤 健一",
                title: "ヘルスケア事業部 部長",
                expertise: "医療機関営業・事業開発",
            },
            Person {
                name: "鈴木 美咲",
                title: "AI研究所 主任研究員",
                expertise: "医用画像解析・深層学習",
            },
            Person {
                name: "高橋 誠",
                title: "法人ネットワーク部 課長",
                expertise: "5G・閉域網設計",
            },
            Person {
                name: "田中 彩",
                title: "経営企画室",
                expertise: "新規事業の収益モデル設計",
            },
        ],
    },
    Roster {
        label: "外部専門家",
        members: &[
            Person {
                name: "山本 浩二",
                title: "病理専門医",
                expertise: "遠隔病理診断",
            },
            Person {
                name: "中村 直子",
                title: "薬事コンサルタント",
                expertise: "プログラム医療機器承認",
            },
            Person {
                name: "小林 大輔",
                title: "医療情報学 准教授",
                expertise: "医療データ標準化",
            },
            Person {
                name: "加藤 由紀",
                title: "弁護士",
                expertise: "医療過誤・個人情報保護",
            },
        ],
    },
];

#[derive(Debug, PartialEq)]
pub struct Slide {
    pub title: &'static str,
    pub image_path: &'static str,
    pub slide_number: &'static str,
}

pub static SLIDES: [Slide; 8] = [
    Slide {
        title: "表紙",
        image_path: "/cancerbridge/表紙.png",
        slide_number: "1 / 8",
    },
    Slide {
        title: "新規事業で解消する社会課題",
        image_path: "/cancerbridge/新規事業で解消する社会課題.png",
        slide_number: "2 / 8",
    },
    Slide {
        title: "ミッション・ビジョン",
        image_path: "/cancerbridge/ミッション・ビジョン.png",
        slide_number: "3 / 8",
    },
    Slide {
        title: "使用する特許",
        image_path: "/cancerbridge/使用する特許.png",
        slide_number: "4 / 8",
    },
    Slide {
        title: "差別化要素:競合比較",
        image_path: "/cancerbridge/差別化要素:競合比較.png",
        slide_number: "5 / 8",
    },
    Slide {
        title: "ビジネスモデル",
        image_path: "/cancerbridge/ビジネスモデル.png",
        slide_number: "6 / 8",
    },
    Slide {
        title: "プロジェクト体制:リーダー",
        image_path: "/cancerbridge/プロジェクト体制:リーダー.png",
        slide_number: "7 / 8",
    },
    Slide {
        title: "まとめ",
        image_path: "/cancerbridge/まとめ.png",
        slide_number: "8 / 8",
    },
];

/// HTML source "typed" over a slide before its rendered image is revealed.
pub fn slide_source(slide: &Slide) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        .slide {{ width: 1280px; min-height: 720px; padding: 40px 60px; }}
        .slide-title {{ font-size: 2.5rem; font-weight: 700; color: #1e40af; }}
        .slide-number {{ font-size: 1.2rem; color: #666; }}
    </style>
</head>
<body>
    <div class="slide">
        <div class="header">
            <h1 class="slide-title">{title}</h1>
            <div class="slide-number">{number}</div>
        </div>
    </div>
</body>
</html>"#,
        title = slide.title,
        number = slide.slide_number
    )
}

#[derive(Debug, PartialEq)]
pub struct VerificationItem {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
}

pub const VERIFICATION_TITLE: &str = "CancerBridge テストマーケティング検証";
pub const VERIFICATION_SUBTITLE: &str = "ソフトバンク経済圏での実現可能性を多角的に検証";

pub static VERIFICATION_ITEMS: [VerificationItem; 16] = [
    VerificationItem { id: 1, title: "財務健全性", description: "NPV・IRR・キャッシュフロー試算" },
    VerificationItem { id: 2, title: "規制チェック", description: "薬機法／FDA SaMD区分確定" },
    VerificationItem { id: 3, title: "データプライバシー", description: "APPI・GDPR・HIPAA準拠" },
    VerificationItem { id: 4, title: "環境規制", description: "CO₂排出・ESG障壁回避" },
    VerificationItem { id: 5, title: "撤退基準", description: "KPI未達時の損失最小撤収条件" },
    VerificationItem { id: 6, title: "サプライチェーン", description: "部材調達性・代替ルート確保" },
    VerificationItem { id: 7, title: "診断性能ベンチマーク", description: "感度・特異度の臨床優位性" },
    VerificationItem { id: 8, title: "医療過誤・賠償責任リスク", description: "誤診責任範囲と保険評価" },
    VerificationItem { id: 9, title: "多施設・外部コホート検証", description: "モデル汎化性能保証" },
    VerificationItem { id: 10, title: "ユーザトレーニング要件", description: "医師・技師教育とCME単位化" },
    VerificationItem { id: 11, title: "倫理委員会／IRB承認手続き", description: "臨床データ利用倫理確認" },
    VerificationItem { id: 12, title: "保守・DevOps体制負荷", description: "運用コスト・SLA維持算定" },
    VerificationItem { id: 13, title: "サイバーセキュリティ", description: "FDAガイドライン準拠セキュリティ" },
    VerificationItem { id: 14, title: "アノテーションパイプライン拡張性", description: "半自動ラベル付け継続学習" },
    VerificationItem { id: 15, title: "スケーラビリティ設計", description: "クラウド／エッジ構成最適化" },
    VerificationItem { id: 16, title: "ナレッジ蓄積", description: "構造化データ保存・再学習促進" },
];

/// Labels drifting across the startup screen.
pub const BUSINESS_IDEAS: &[&str] = &[
    "AI-Powered Medical Diagnostics",
    "Blockchain Identity Verification",
    "VR Real Estate Tours",
    "Crowdsourced Financial Platform",
    "Sustainable Supply Chain Analytics",
    "Digital Twin Manufacturing",
    "Autonomous Transportation Network",
    "AR Navigation Systems",
    "Smart City Infrastructure",
    "IoT Agricultural Ecosystem",
    "Quantum Computing Services",
    "Voice AI Assistant Integration",
    "Contactless Payment Solutions",
    "Clean Energy Trading Platform",
    "Biotech Drug Discovery",
    "Cybersecurity Insurance",
    "Remote Healthcare Monitoring",
    "Drone Delivery Network",
    "Food-Tech Alternative Proteins",
    "Space Tourism Platform",
    "NFT Marketplace Solutions",
    "Metaverse Real Estate",
    "Digital Twin Urban Planning",
    "Robotic Customer Service",
    "Sustainable Fashion Ecosystem",
    "AI Creative Tools Suite",
    "Biometric Authentication",
    "Micro-Mobility Services",
    "Sharing Economy Platform",
    "Remote Work Optimization",
    "Digital Transformation Consulting",
    "Neural Interface Technology",
    "Smart Contract Legal Framework",
    "Personalized Education Platform",
    "Carbon Offset Marketplace",
    "Ocean Resource Conservation Tech",
    "Renewable Energy Storage",
    "Circular Economy Solutions",
    "Digital Health Management",
    "Predictive Maintenance Systems",
    "3D-Printed Architecture",
    "Micro-Insurance Platform",
    "Alternative Data Analytics",
    "Edge Computing Network",
    "Personal Data Sovereignty",
    "Self-Sovereign Identity",
    "Autonomous Drone Surveying",
    "Virtual Influencer Agency",
    "Sustainable Investment Platform",
    "AI Matching Algorithms",
    "Space-Based Solar Power",
    "Quantum Cryptography",
    "Neurotech Cognitive Enhancement",
    "Human Augmentation Solutions",
    "Asteroid Mining Ventures",
    "Longevity Biotech Research",
    "Vertical Farming Systems",
    "Lab-Grown Meat Production",
    "Brain-Computer Interface",
    "Autonomous Underwater Vehicles",
];
