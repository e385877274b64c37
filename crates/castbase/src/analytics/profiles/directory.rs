use chrono::NaiveDate;

use super::{ProfileSnapshot, RecentActivity};
use crate::analytics::quality::ActiveStatus;

/// Fixed statistics for a well-known account, served before any seeded fallback.
pub struct KnownProfile {
    pub username: &'static str,
    pub fid: u64,
    pub followers: u64,
    pub following: u64,
    pub total_casts: u64,
    pub total_likes: u64,
    pub total_recasts: u64,
    pub avg_engagement: f64,
    pub rank: u64,
    pub spam_score: f64,
    pub quality_score: f64,
    pub neynar_score: f64,
    pub joined: (i32, u32, u32),
    pub recent_activity: (u64, u64, u64),
}

pub static KNOWN_PROFILES: [KnownProfile; 5] = [
    KnownProfile {
        username: "vitalik.eth",
        fid: 5650,
        followers: 245_680,
        following: 892,
        total_casts: 12_450,
        total_likes: 456_780,
        total_recasts: 89_340,
        avg_engagement: 45.2,
        rank: 1,
        spam_score: 0.1,
        quality_score: 99.9,
        neynar_score: 95.5,
        joined: (2023, 8, 15),
        recent_activity: (234, 5_670, 1_230),
    },
    KnownProfile {
        username: "dwr.eth",
        fid: 3,
        followers: 189_430,
        following: 1_240,
        total_casts: 18_920,
        total_likes: 387_650,
        total_recasts: 72_340,
        avg_engagement: 38.7,
        rank: 2,
        spam_score: 0.2,
        quality_score: 99.8,
        neynar_score: 92.3,
        joined: (2023, 7, 1),
        recent_activity: (189, 4_320, 980),
    },
    KnownProfile {
        username: "jessepollak",
        fid: 6,
        followers: 156_780,
        following: 2_340,
        total_casts: 15_680,
        total_likes: 324_560,
        total_recasts: 65_780,
        avg_engagement: 32.1,
        rank: 3,
        spam_score: 0.3,
        quality_score: 99.7,
        neynar_score: 89.7,
        joined: (2023, 7, 15),
        recent_activity: (156, 3_890, 890),
    },
    KnownProfile {
        username: "balajis.eth",
        fid: 1234,
        followers: 134_560,
        following: 567,
        total_casts: 9_870,
        total_likes: 289_450,
        total_recasts: 58_900,
        avg_engagement: 28.9,
        rank: 4,
        spam_score: 0.2,
        quality_score: 99.8,
        neynar_score: 87.2,
        joined: (2023, 8, 1),
        recent_activity: (98, 2_890, 670),
    },
    KnownProfile {
        username: "cdixon.eth",
        fid: 2567,
        followers: 112_340,
        following: 890,
        total_casts: 8_450,
        total_likes: 243_200,
        total_recasts: 48_900,
        avg_engagement: 24.3,
        rank: 5,
        spam_score: 0.1,
        quality_score: 99.9,
        neynar_score: 85.6,
        joined: (2023, 7, 20),
        recent_activity: (84, 2_340, 560),
    },
];

pub fn find_by_username(username: &str) -> Option<&'static KnownProfile> {
    KNOWN_PROFILES
        .iter()
        .find(|profile| profile.username == username)
}

pub fn find_by_fid(fid: u64) -> Option<&'static KnownProfile> {
    KNOWN_PROFILES.iter().find(|profile| profile.fid == fid)
}

impl KnownProfile {
    pub fn snapshot(&self) -> ProfileSnapshot {
        let (year, month, day) = self.joined;
        let (casts, likes, recasts) = self.recent_activity;

        ProfileSnapshot {
            username: format!("@{}", self.username),
            fid: self.fid,
            followers: self.followers,
            following: self.following,
            total_casts: self.total_casts,
            total_likes: self.total_likes,
            total_recasts: self.total_recasts,
            avg_engagement: self.avg_engagement,
            rank: self.rank,
            spam_score: self.spam_score,
            quality_score: self.quality_score,
            neynar_score: self.neynar_score,
            join_date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN),
            active_status: ActiveStatus::Active,
            recent_activity: RecentActivity {
                casts,
                likes,
                recasts,
            },
        }
    }
}
