// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 公告分类
///
/// 封闭的分类枚举，声明顺序即关键词匹配的优先级顺序。
/// `Etc` 为兜底分类，没有关键词。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// 特别讲座
    SpecialLecture,
    /// 策划/营销
    PlanningMarketing,
    /// 就业/实习
    JobInternship,
    /// 志愿活动
    Volunteer,
    /// IT/软件
    ItSw,
    /// 学习小组
    Study,
    /// 设计
    Design,
    /// 创业
    Startup,
    /// 视频/内容
    VideoContent,
    /// 支持团/记者团
    SupportersPress,
    /// 学务通知
    AcademicInfo,
    /// 其他（兜底）
    Etc,
}

impl Category {
    /// 所有分类，按优先级排序
    pub const ALL: [Category; 12] = [
        Category::SpecialLecture,
        Category::PlanningMarketing,
        Category::JobInternship,
        Category::Volunteer,
        Category::ItSw,
        Category::Study,
        Category::Design,
        Category::Startup,
        Category::VideoContent,
        Category::SupportersPress,
        Category::AcademicInfo,
        Category::Etc,
    ];

    /// 兜底分类
    pub const CATCH_ALL: Category = Category::Etc;

    /// 数据库中保存的分类ID（1..=12）
    pub fn id(self) -> i32 {
        match self {
            Category::SpecialLecture => 1,
            Category::PlanningMarketing => 2,
            Category::JobInternship => 3,
            Category::Volunteer => 4,
            Category::ItSw => 5,
            Category::Study => 6,
            Category::Design => 7,
            Category::Startup => 8,
            Category::VideoContent => 9,
            Category::SupportersPress => 10,
            Category::AcademicInfo => 11,
            Category::Etc => 12,
        }
    }

    /// 根据分类ID查找分类
    ///
    /// # 返回值
    ///
    /// 超出枚举范围的ID返回 `None`
    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.id() == id)
    }

    /// 分类代码
    pub fn code(self) -> &'static str {
        match self {
            Category::SpecialLecture => "SPECIAL_LECTURE",
            Category::PlanningMarketing => "PLANNING_MARKETING",
            Category::JobInternship => "JOB_INTERNSHIP",
            Category::Volunteer => "VOLUNTEER",
            Category::ItSw => "IT_SW",
            Category::Study => "STUDY",
            Category::Design => "DESIGN",
            Category::Startup => "STARTUP",
            Category::VideoContent => "VIDEO_CONTENT",
            Category::SupportersPress => "SUPPORTERS_PRESS",
            Category::AcademicInfo => "ACADEMIC_INFO",
            Category::Etc => "ETC",
        }
    }

    /// 显示名称（公告板使用的韩文名称）
    pub fn display_name(self) -> &'static str {
        match self {
            Category::SpecialLecture => "특강",
            Category::PlanningMarketing => "기획/마케팅",
            Category::JobInternship => "취업/인턴십",
            Category::Volunteer => "봉사 활동",
            Category::ItSw => "IT/SW",
            Category::Study => "스터디",
            Category::Design => "디자인",
            Category::Startup => "창업",
            Category::VideoContent => "영상/콘텐츠",
            Category::SupportersPress => "서포터즈/기자단",
            Category::AcademicInfo => "학사 안내",
            Category::Etc => "기타",
        }
    }

    /// 关键词列表（均为小写）
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::SpecialLecture => &[
                "특강", "세미나", "강연", "강의", "lecture", "seminar", "워크샵", "workshop",
                "교육", "설명회", "오리엔테이션", "briefing", "안내회",
            ],
            Category::PlanningMarketing => &[
                "기획", "마케팅", "브랜딩", "홍보", "marketing", "planning", "브랜드", "광고",
                "캠페인", "프로모션", "promotion", "홍보대사", "기획안", "마케터",
            ],
            Category::JobInternship => &[
                "채용", "인턴", "recruit", "신입", "취업", "job", "career", "면접", "입사",
                "구인", "구직", "employment", "사원", "직원", "인력", "직무", "채용공고",
                "모집공고", "모집", "개발자", "지원", "서류", "취직",
            ],
            Category::Volunteer => &[
                "봉사", "volunteer", "자원봉사", "사회공헌", "기부", "봉사활동", "사회봉사",
                "나눔", "헌혈", "환경", "지역사회", "복지",
            ],
            Category::ItSw => &[
                "개발", "프로그래", "ai", "데이터", "코딩", "software", "it", "프로그래밍",
                "앱", "app", "웹", "web", "시스템", "database", "알고리즘", "머신러닝",
                "딥러닝", "빅데이터", "클라우드", "서버", "네트워크", "보안",
            ],
            Category::Study => &[
                "스터디", "study", "공부", "학습", "튜터링", "멘토링", "교육", "학습모임",
                "독서", "시험", "자격증", "토익", "토플", "어학", "언어",
            ],
            Category::Design => &[
                "디자인", "ui", "ux", "design", "그래픽", "웹디자인", "디자이너", "포토샵",
                "일러스트", "영상편집", "3d", "타이포그래피", "브랜딩디자인",
            ],
            Category::Startup => &[
                "창업", "startup", "사업", "벤처", "기업가정신", "사업계획", "투자", "펀딩",
                "비즈니스", "스타트업", "창업가", "entrepreneur",
            ],
            Category::VideoContent => &[
                "영상", "콘텐츠", "video", "content", "유튜브", "영화", "촬영", "편집",
                "미디어", "방송", "라이브", "스트리밍", "크리에이터",
            ],
            Category::SupportersPress => &[
                "서포터즈", "기자단", "supporters", "press", "홍보대사", "리포터", "앰버서더",
                "블로거", "인플루언서", "홍보단", "서포터", "대학생기자",
            ],
            Category::AcademicInfo => &[
                "학사", "수강", "성적", "졸업", "학점", "등록", "장학", "academic", "학적",
                "수업", "강의", "학기", "등록금", "장학금", "성적표", "졸업요건",
            ],
            Category::Etc => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
